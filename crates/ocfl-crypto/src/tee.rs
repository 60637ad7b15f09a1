use std::io::{self, Write};

/// Writes every byte to a destination and copies the accepted bytes to a
/// second "tee" writer, typically a [`ContentDigester`](crate::ContentDigester).
///
/// A short write on the tee side is an error: the digest would no longer
/// describe what reached the destination.
pub struct TeeWriter<W, T> {
    dest: W,
    tee: T,
    written: u64,
}

impl<W: Write, T: Write> TeeWriter<W, T> {
    pub fn new(dest: W, tee: T) -> Self {
        Self {
            dest,
            tee,
            written: 0,
        }
    }

    /// Bytes accepted by both writers so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_parts(self) -> (W, T) {
        (self.dest, self.tee)
    }
}

impl<W: Write, T: Write> Write for TeeWriter<W, T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let accepted = self.dest.write(buf)?;
        let teed = self.tee.write(&buf[..accepted])?;
        if teed != accepted {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("tee accepted {teed} bytes but destination accepted {accepted}"),
            ));
        }
        self.written += accepted as u64;
        Ok(accepted)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.dest.flush()?;
        self.tee.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContentDigester, DigestAlgorithm};

    /// Accepts at most `limit` bytes per call.
    struct Stingy {
        limit: usize,
        seen: Vec<u8>,
    }

    impl Write for Stingy {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.limit);
            self.seen.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn copies_to_both_sides() {
        let alg = DigestAlgorithm::sha512();
        let mut tee = TeeWriter::new(Vec::new(), ContentDigester::new(&alg).unwrap());
        io::copy(&mut &b"myContent"[..], &mut tee).unwrap();
        assert_eq!(tee.written(), 9);

        let (dest, digester) = tee.into_parts();
        assert_eq!(dest, b"myContent");
        assert_eq!(
            digester.finalize_hex(),
            ContentDigester::digest_bytes(&alg, b"myContent").unwrap()
        );
    }

    #[test]
    fn partial_destination_writes_stay_in_step() {
        let mut tee = TeeWriter::new(Stingy { limit: 3, seen: vec![] }, Vec::new());
        tee.write_all(b"abcdefgh").unwrap();
        let (dest, copy) = tee.into_parts();
        assert_eq!(dest.seen, b"abcdefgh");
        assert_eq!(copy, b"abcdefgh");
    }

    #[test]
    fn short_tee_write_is_an_error() {
        let mut tee = TeeWriter::new(Vec::new(), Stingy { limit: 2, seen: vec![] });
        let err = tee.write(b"abcdef").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }
}
