use alloy::primitives::Bytes;

use super::FlowMatrixError;

/// Pack vertex indices as consecutive big-endian `uint16` values.
///
/// Any index above `u16::MAX` fails with `CoordinateOverflow`.
pub fn pack_coordinates(coordinates: &[usize]) -> Result<Bytes, FlowMatrixError> {
    let mut packed = Vec::with_capacity(coordinates.len() * 2);
    for &coordinate in coordinates {
        let value = u16::try_from(coordinate)
            .map_err(|_| FlowMatrixError::CoordinateOverflow { coordinate })?;
        packed.extend_from_slice(&value.to_be_bytes());
    }
    Ok(Bytes::from(packed))
}

/// Inverse of [`pack_coordinates`].
pub fn unpack_coordinates(packed: &[u8]) -> Result<Vec<u16>, FlowMatrixError> {
    if packed.len() % 2 != 0 {
        return Err(FlowMatrixError::MalformedCoordinates { len: packed.len() });
    }
    Ok(packed
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect())
}
