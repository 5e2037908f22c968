//! Wire codec primitives
//!
//! Exact-length reads and no-short-write sends over a byte stream. Every
//! field boundary in the protocol is derived from a declared length; nothing
//! here infers framing from input size or timing, and a short read is an
//! error, never a partial result.

use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Read a single byte.
pub async fn read_u8<R>(stream: &mut R) -> io::Result<u8>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 1];
    stream.read_exact(&mut buf).await?;
    Ok(buf[0])
}

/// Read a big-endian (network order) 16-bit integer.
pub async fn read_u16_be<R>(stream: &mut R) -> io::Result<u16>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; 2];
    stream.read_exact(&mut buf).await?;
    Ok(u16::from_be_bytes(buf))
}

/// Read exactly `n` bytes.
pub async fn read_bytes<R>(stream: &mut R, n: usize) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; n];
    stream.read_exact(&mut buf).await?;
    Ok(buf)
}

/// Read a length-prefixed byte string: one length byte `L`, then `L` bytes.
///
/// `L = 0` yields an empty vector; whether that is acceptable is the
/// caller's concern.
pub async fn read_length_prefixed<R>(stream: &mut R) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let len = read_u8(stream).await? as usize;
    read_bytes(stream, len).await
}

/// Write a complete frame and flush it, with no short write.
pub async fn write_frame<W>(stream: &mut W, frame: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    stream.write_all(frame).await?;
    stream.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_read_u8() {
        let mut cursor = Cursor::new(vec![0x05, 0x01]);
        assert_eq!(read_u8(&mut cursor).await.unwrap(), 0x05);
        assert_eq!(read_u8(&mut cursor).await.unwrap(), 0x01);
    }

    #[tokio::test]
    async fn test_read_u8_empty() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        assert!(read_u8(&mut cursor).await.is_err());
    }

    #[tokio::test]
    async fn test_read_u16_be() {
        let mut cursor = Cursor::new(vec![0x00, 0x50]);
        assert_eq!(read_u16_be(&mut cursor).await.unwrap(), 80);

        let mut cursor = Cursor::new(vec![0x01, 0xBB]);
        assert_eq!(read_u16_be(&mut cursor).await.unwrap(), 443);
    }

    #[tokio::test]
    async fn test_read_bytes_exact() {
        let mut cursor = Cursor::new(vec![1, 2, 3, 4, 5]);
        let bytes = read_bytes(&mut cursor, 4).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_read_bytes_short_input_is_error() {
        let mut cursor = Cursor::new(vec![1, 2]);
        let result = read_bytes(&mut cursor, 4).await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            std::io::ErrorKind::UnexpectedEof
        );
    }

    #[tokio::test]
    async fn test_read_length_prefixed() {
        let mut data = vec![8u8];
        data.extend_from_slice(b"zhangsan");
        let mut cursor = Cursor::new(data);
        let bytes = read_length_prefixed(&mut cursor).await.unwrap();
        assert_eq!(bytes, b"zhangsan");
    }

    #[tokio::test]
    async fn test_read_length_prefixed_zero() {
        let mut cursor = Cursor::new(vec![0u8, 0xAA]);
        let bytes = read_length_prefixed(&mut cursor).await.unwrap();
        assert!(bytes.is_empty());
        // The trailing byte is untouched
        assert_eq!(read_u8(&mut cursor).await.unwrap(), 0xAA);
    }

    #[tokio::test]
    async fn test_read_length_prefixed_truncated() {
        let mut cursor = Cursor::new(vec![5u8, b'a', b'b']);
        assert!(read_length_prefixed(&mut cursor).await.is_err());
    }

    #[tokio::test]
    async fn test_write_frame() {
        let mut buffer = Vec::new();
        write_frame(&mut buffer, &[0x05, 0x02]).await.unwrap();
        assert_eq!(buffer, vec![0x05, 0x02]);
    }

    #[tokio::test]
    async fn test_fragmented_reads_reassemble() {
        // A peer may deliver one byte at a time; read_exact must reassemble.
        let (mut client, mut server) = tokio::io::duplex(64);

        use tokio::io::AsyncWriteExt;
        tokio::spawn(async move {
            for b in [4u8, b'p', b'i', b'n', b'g'] {
                client.write_all(&[b]).await.unwrap();
                client.flush().await.unwrap();
            }
        });

        let bytes = read_length_prefixed(&mut server).await.unwrap();
        assert_eq!(bytes, b"ping");
    }
}
