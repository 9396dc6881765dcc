use crate::error::ThumbnailError;

pub const MDAT: [u8; 4] = *b"mdat";

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_u64(data: &[u8], at: usize) -> Option<u64> {
    let bytes = data.get(at..at + 8)?;
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    Some(u64::from_be_bytes(buf))
}

/// Returns the payload of the first top-level ISO-BMFF box of `box_type`.
/// Truncated boxes are an error; partial containers are not accepted.
pub fn extract_box(data: &[u8], box_type: [u8; 4]) -> Result<&[u8], ThumbnailError> {
    let mut offset = 0usize;
    while offset < data.len() {
        let size32 = read_u32(data, offset).ok_or(ThumbnailError::MalformedBox { offset })?;
        let kind = data
            .get(offset + 4..offset + 8)
            .ok_or(ThumbnailError::MalformedBox { offset })?;

        let (header, size) = match size32 {
            0 => (8usize, (data.len() - offset) as u64),
            1 => {
                let large = read_u64(data, offset + 8).ok_or(ThumbnailError::MalformedBox { offset })?;
                (16usize, large)
            }
            n => (8usize, n as u64),
        };

        let end = usize::try_from(size)
            .ok()
            .and_then(|size| offset.checked_add(size))
            .filter(|end| size >= header as u64 && *end <= data.len())
            .ok_or(ThumbnailError::MalformedBox { offset })?;

        if kind == box_type {
            return Ok(&data[offset + header..end]);
        }
        offset = end;
    }

    Err(ThumbnailError::MissingBox {
        box_type: String::from_utf8_lossy(&box_type).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_box(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
        out.extend_from_slice(kind);
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn finds_mdat_after_other_boxes() {
        let mut data = make_box(b"styp", b"msdh");
        data.extend(make_box(b"moof", &[0u8; 12]));
        data.extend(make_box(b"mdat", b"\xff\xd8jpeg"));
        assert_eq!(extract_box(&data, MDAT).unwrap(), b"\xff\xd8jpeg");
    }

    #[test]
    fn large_size_boxes_are_supported() {
        let payload = b"abc";
        let mut data = 1u32.to_be_bytes().to_vec();
        data.extend_from_slice(b"mdat");
        data.extend_from_slice(&((payload.len() + 16) as u64).to_be_bytes());
        data.extend_from_slice(payload);
        assert_eq!(extract_box(&data, MDAT).unwrap(), payload);
    }

    #[test]
    fn zero_size_box_runs_to_end() {
        let mut data = make_box(b"moof", &[1, 2]);
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(b"mdat");
        data.extend_from_slice(b"tail");
        assert_eq!(extract_box(&data, MDAT).unwrap(), b"tail");
    }

    #[test]
    fn truncated_box_is_malformed() {
        let mut data = make_box(b"mdat", b"0123456789");
        data.truncate(12);
        assert!(matches!(
            extract_box(&data, MDAT),
            Err(ThumbnailError::MalformedBox { offset: 0 })
        ));
    }

    #[test]
    fn missing_box_is_reported() {
        let data = make_box(b"moov", b"");
        assert!(matches!(
            extract_box(&data, MDAT),
            Err(ThumbnailError::MissingBox { .. })
        ));
    }
}
