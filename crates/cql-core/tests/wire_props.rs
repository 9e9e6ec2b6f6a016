//! 读取器对任意输入的健壮性：不 panic、失败不消费、成功只消费声明的长度。

use cql_core::{BeReader, BeWriter};
use proptest::prelude::*;

proptest! {
    #[test]
    fn short_bytes_never_overrun(raw in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mut reader = BeReader::new(raw.clone());
        match reader.read_short_bytes("cell") {
            Ok(payload) => {
                prop_assert!(raw.len() >= 2);
                let declared = usize::from(u16::from_be_bytes([raw[0], raw[1]]));
                prop_assert_eq!(payload.len(), declared);
                prop_assert_eq!(reader.remaining(), raw.len() - 2 - declared);
            }
            Err(err) => {
                prop_assert!(err.is_protocol_violation());
                prop_assert_eq!(reader.remaining(), raw.len());
            }
        }
    }

    #[test]
    fn strings_survive_the_length_prefix(text in "\\PC{0,40}") {
        let mut writer = BeWriter::new();
        writer.write_string(&text, "name").unwrap();
        let mut reader = BeReader::new(writer.freeze());
        prop_assert_eq!(reader.read_string("name").unwrap(), text);
        prop_assert!(reader.is_empty());
    }
}
