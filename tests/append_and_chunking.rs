//! End-to-end coverage of table append semantics and chunk rollover (S1).

use colstore::{ChunkId, ChunkOffset, ColumnId, DataType, StorageError, Table, Variant};

#[test]
fn append_and_shape_s1() {
    let table = Table::new(2).unwrap();
    table.add_column("a", DataType::Int32).unwrap();
    table.add_column("b", DataType::String).unwrap();

    table.append(vec![Variant::Int32(4), Variant::String("Hello,".into())]).unwrap();
    table.append(vec![Variant::Int32(6), Variant::String("world".into())]).unwrap();
    table.append(vec![Variant::Int32(3), Variant::String("!".into())]).unwrap();

    assert_eq!(table.chunk_count(), 2);
    assert_eq!(table.row_count(), 3);

    let chunk0 = table.get_chunk(ChunkId(0)).unwrap();
    assert_eq!(chunk0.size(), 2);
    assert_eq!(chunk0.get_cell(ColumnId(0), ChunkOffset(0)).unwrap(), Variant::Int32(4));
    assert_eq!(chunk0.get_cell(ColumnId(1), ChunkOffset(0)).unwrap(), Variant::String("Hello,".into()));
    assert_eq!(chunk0.get_cell(ColumnId(0), ChunkOffset(1)).unwrap(), Variant::Int32(6));
    assert_eq!(chunk0.get_cell(ColumnId(1), ChunkOffset(1)).unwrap(), Variant::String("world".into()));

    let chunk1 = table.get_chunk(ChunkId(1)).unwrap();
    assert_eq!(chunk1.size(), 1);
    assert_eq!(chunk1.get_cell(ColumnId(0), ChunkOffset(0)).unwrap(), Variant::Int32(3));
    assert_eq!(chunk1.get_cell(ColumnId(1), ChunkOffset(0)).unwrap(), Variant::String("!".into()));
}

#[test]
fn row_count_matches_sum_of_chunk_sizes_across_many_rollovers() {
    let table = Table::new(3).unwrap();
    table.add_column("n", DataType::Int64).unwrap();

    for i in 0..10 {
        table.append(vec![Variant::Int64(i)]).unwrap();
    }

    assert_eq!(table.row_count(), 10);
    assert_eq!(table.chunk_count(), 4); // 3 + 3 + 3 + 1

    for chunk_index in 0..table.chunk_count() - 1 {
        let chunk = table.get_chunk(ChunkId::from(chunk_index)).unwrap();
        assert_eq!(chunk.size(), table.target_chunk_size());
    }
    let tail = table.get_chunk(ChunkId::from(table.chunk_count() - 1)).unwrap();
    assert_eq!(tail.size(), 1);
}

#[test]
fn schema_locks_after_first_append() {
    let table = Table::new(4).unwrap();
    table.add_column("a", DataType::Int32).unwrap();
    table.append(vec![Variant::Int32(1)]).unwrap();

    let err = table.add_column("b", DataType::String).unwrap_err();
    assert!(matches!(err, StorageError::SchemaLocked { row_count: 1 }));
}

#[test]
fn append_arity_mismatch_leaves_table_unchanged() {
    let table = Table::new(4).unwrap();
    table.add_column("a", DataType::Int32).unwrap();
    table.add_column("b", DataType::Int32).unwrap();

    let err = table.append(vec![Variant::Int32(1)]).unwrap_err();
    assert!(matches!(err, StorageError::ArityMismatch { expected: 2, got: 1 }));
    assert_eq!(table.row_count(), 0);
    assert_eq!(table.chunk_count(), 0);
}
