//! End-to-end coverage of `TableScan` over value-backed and reference-backed
//! inputs, including composition through an intermediate scan (S5, S6).

use std::sync::Arc;

use colstore::{
    ChunkId, ChunkOffset, ColumnId, DataType, Operator, ReferenceSegment, ScanType, Segment, Table,
    TableScan, TableWrapper, Variant,
};

fn base_table() -> Arc<Table> {
    let table = Table::new(2).unwrap();
    table.add_column("a", DataType::Int32).unwrap();
    for v in [4, 6, 3] {
        table.append(vec![Variant::Int32(v)]).unwrap();
    }
    Arc::new(table)
}

fn reference_column(table: &Table, chunk_id: ChunkId, column_id: ColumnId) -> ReferenceSegment {
    table
        .get_chunk(chunk_id)
        .unwrap()
        .with_segment(column_id, |segment| {
            segment
                .as_any()
                .downcast_ref::<ReferenceSegment>()
                .expect("TableScan output segments are always ReferenceSegment")
                .clone()
        })
        .unwrap()
}

#[test]
fn scan_on_value_input_s5() {
    let base = base_table();
    let input = Arc::new(TableWrapper::new(Arc::clone(&base)));
    input.execute().unwrap();

    let scan = TableScan::new(input, ColumnId(0), ScanType::GreaterEqual, Variant::Int32(4));
    scan.execute().unwrap();
    let output = scan.get_output().expect("execute() must populate output");

    assert_eq!(output.column_count(), base.column_count());
    assert_eq!(output.column_name(ColumnId(0)).unwrap(), "a");
    assert_eq!(output.chunk_count(), 1);

    let reference = reference_column(&output, ChunkId(0), ColumnId(0));
    assert!(Arc::ptr_eq(reference.referenced_table(), &base));
    similar_asserts::assert_eq!(
        reference.pos_list().as_slice(),
        &[
            colstore::RowId::new(ChunkId(0), ChunkOffset(0)),
            colstore::RowId::new(ChunkId(0), ChunkOffset(1)),
        ]
    );
}

#[test]
fn scan_on_reference_input_composes_to_base_table_s6() {
    let base = base_table();
    let input = Arc::new(TableWrapper::new(Arc::clone(&base)));
    input.execute().unwrap();

    let first = Arc::new(TableScan::new(input, ColumnId(0), ScanType::GreaterEqual, Variant::Int32(4)));
    first.execute().unwrap();

    let second = TableScan::new(first, ColumnId(0), ScanType::Less, Variant::Int32(6));
    second.execute().unwrap();
    let output = second.get_output().unwrap();

    assert_eq!(output.chunk_count(), 1);
    let reference = reference_column(&output, ChunkId(0), ColumnId(0));
    // Must reference the original base table, never the intermediate
    // reference-segment table — reference segments do not nest.
    assert!(Arc::ptr_eq(reference.referenced_table(), &base));
    similar_asserts::assert_eq!(reference.pos_list().as_slice(), &[colstore::RowId::new(ChunkId(0), ChunkOffset(0))]);
}

#[test]
fn scan_preserves_schema_and_input_order() {
    let table = Table::new(5).unwrap();
    table.add_column("id", DataType::Int32).unwrap();
    table.add_column("name", DataType::String).unwrap();
    for (id, name) in [(1, "a"), (2, "b"), (3, "c"), (4, "d")] {
        table.append(vec![Variant::Int32(id), Variant::String(name.into())]).unwrap();
    }
    let base = Arc::new(table);

    let input = Arc::new(TableWrapper::new(Arc::clone(&base)));
    input.execute().unwrap();

    let scan = TableScan::new(input, ColumnId(0), ScanType::NotEqual, Variant::Int32(2));
    scan.execute().unwrap();
    let output = scan.get_output().unwrap();

    assert_eq!(output.column_names(), base.column_names());

    let reference = reference_column(&output, ChunkId(0), ColumnId(0));
    let offsets: Vec<u32> = reference.pos_list().iter().map(|r| r.chunk_offset.0).collect();
    assert_eq!(offsets, vec![0, 2, 3]);
}

#[test]
fn scan_with_no_matches_yields_zero_chunk_result() {
    let base = base_table();
    let input = Arc::new(TableWrapper::new(Arc::clone(&base)));
    input.execute().unwrap();

    let scan = TableScan::new(input, ColumnId(0), ScanType::Greater, Variant::Int32(1_000));
    scan.execute().unwrap();
    let output = scan.get_output().unwrap();

    assert_eq!(output.chunk_count(), 0);
    assert_eq!(output.row_count(), 0);
}
