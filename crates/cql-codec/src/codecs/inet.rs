//! inet：4 字节 IPv4 或 16 字节 IPv6，不含端口。

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use bytes::Bytes;
use cql_core::{ColumnInfo, CqlError, CqlValue, NativeType, Result};

use super::mismatch;
use crate::registry::{CodecRegistry, ColumnCodec};

/// 按长度区分地址族的 inet 编解码器。
#[derive(Clone, Copy, Debug, Default)]
pub struct InetCodec;

impl ColumnCodec for InetCodec {
    fn decode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        let addr = if let Ok(octets) = <[u8; 4]>::try_from(bytes.as_ref()) {
            IpAddr::V4(Ipv4Addr::from(octets))
        } else if let Ok(octets) = <[u8; 16]>::try_from(bytes.as_ref()) {
            IpAddr::V6(Ipv6Addr::from(octets))
        } else {
            return Err(CqlError::protocol(
                "inet value",
                format!("expected 4 or 16 bytes, got {}", bytes.len()),
            ));
        };
        Ok(CqlValue::Inet(addr))
    }

    fn native_type(&self, _registry: &dyn CodecRegistry, _info: &ColumnInfo) -> NativeType {
        NativeType::Inet
    }

    fn encode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        match value {
            CqlValue::Inet(IpAddr::V4(addr)) => Ok(Bytes::copy_from_slice(&addr.octets())),
            CqlValue::Inet(IpAddr::V6(addr)) => Ok(Bytes::copy_from_slice(&addr.octets())),
            other => Err(mismatch(NativeType::Inet, other)),
        }
    }
}
