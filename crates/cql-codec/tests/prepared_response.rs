//! prepared 响应：正常布局、长度越界与元数据截断。

use bytes::Bytes;
use cql_codec::metadata::FLAG_GLOBAL_TABLES_SPEC;
use cql_codec::parse_prepared;
use cql_core::{BeReader, BeWriter, ColumnTypeCode, CqlError, TypeSpec};

fn prepared_payload(query_id: &[u8]) -> Bytes {
    let mut writer = BeWriter::new();
    writer.write_short_bytes(query_id, "query id").unwrap();
    writer.write_i32(FLAG_GLOBAL_TABLES_SPEC);
    writer.write_i32(2);
    writer.write_string("shop", "keyspace").unwrap();
    writer.write_string("orders", "table").unwrap();
    writer.write_string("id", "column").unwrap();
    TypeSpec::simple(ColumnTypeCode::Uuid)
        .write_option(&mut writer)
        .unwrap();
    writer.write_string("lines", "column").unwrap();
    TypeSpec::map(
        TypeSpec::simple(ColumnTypeCode::Text),
        TypeSpec::simple(ColumnTypeCode::Int),
    )
    .write_option(&mut writer)
    .unwrap();
    writer.freeze()
}

#[test]
fn parses_query_id_and_bound_columns() {
    let query_id = hex::decode("5f3a9c0e11aa4d02").unwrap();
    let mut reader = BeReader::new(prepared_payload(&query_id));
    let handle = parse_prepared(&mut reader).unwrap();

    assert_eq!(handle.query_id.as_ref(), query_id.as_slice());
    assert_eq!(handle.query_id_hex(), "5f3a9c0e11aa4d02");
    let names: Vec<_> = handle.metadata.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["id", "lines"]);
    assert_eq!(handle.metadata.columns[1].spec.to_string(), "map<text, int>");
    assert!(reader.is_empty());
}

#[test]
fn declared_length_beyond_buffer_is_a_protocol_violation() {
    // 声明 16 字节，实际只有 3 字节。
    let mut reader = BeReader::new(Bytes::from_static(&[0x00, 0x10, 0xaa, 0xbb, 0xcc]));
    let err = parse_prepared(&mut reader).unwrap_err();
    assert!(matches!(err, CqlError::ProtocolViolation { .. }), "{err}");
    assert_eq!(err.code(), "cql.protocol.violation");
}

#[test]
fn truncated_metadata_is_reported_not_padded() {
    let full = prepared_payload(&[1, 2, 3, 4]);
    for cut in [2, 6, 10, full.len() - 1] {
        let mut reader = BeReader::new(full.slice(..cut));
        let err = parse_prepared(&mut reader).unwrap_err();
        assert!(err.is_protocol_violation(), "cut at {cut}: {err}");
    }
}

#[test]
fn empty_query_id_is_allowed() {
    let mut reader = BeReader::new(prepared_payload(&[]));
    let handle = parse_prepared(&mut reader).unwrap();
    assert!(handle.query_id.is_empty());
    assert_eq!(handle.metadata.columns.len(), 2);
}

#[test]
fn runaway_type_nesting_is_a_protocol_violation() {
    let mut writer = BeWriter::new();
    writer.write_short_bytes(&[], "query id").unwrap();
    writer.write_i32(FLAG_GLOBAL_TABLES_SPEC);
    writer.write_i32(1);
    writer.write_string("ks", "keyspace").unwrap();
    writer.write_string("t", "table").unwrap();
    writer.write_string("c", "column").unwrap();
    for _ in 0..200_000 {
        writer.write_u16(ColumnTypeCode::List.wire_id());
    }
    writer.write_u16(ColumnTypeCode::Int.wire_id());

    let mut reader = BeReader::new(writer.freeze());
    let err = parse_prepared(&mut reader).unwrap_err();
    assert!(err.is_protocol_violation(), "{err}");
}
