//! Pre-auth encoding
//!
//! This is a low level detail used to build PAST version implementations.

/// A sink for pre-auth encoded bytes, such as a MAC, a hash or a `Vec<u8>`.
pub trait WriteBytes {
    fn write(&mut self, slice: &[u8]);
}

impl WriteBytes for Vec<u8> {
    fn write(&mut self, slice: &[u8]) {
        self.extend_from_slice(slice);
    }
}

impl<W: WriteBytes + ?Sized> WriteBytes for &mut W {
    fn write(&mut self, slice: &[u8]) {
        W::write(self, slice);
    }
}

/// Encode `N` pieces, each being the concatenation of its slices.
///
/// `LE64(N) || LE64(len(p0)) || p0 || ... || LE64(len(pN-1)) || pN-1`
pub fn pre_auth_encode<const N: usize>(pieces: [&[&[u8]]; N], mut out: impl WriteBytes) {
    let len = N as u64;
    out.write(&len.to_le_bytes());
    for piece in pieces {
        let len: u64 = piece.iter().map(|x| x.len() as u64).sum();
        out.write(&len.to_le_bytes());
        for x in piece {
            out.write(x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WriteBytes;

    fn pae_vec<const N: usize>(pieces: [&[&[u8]]; N]) -> Vec<u8> {
        let mut vec = Vec::new();
        super::pre_auth_encode(pieces, &mut vec);
        vec
    }

    #[test]
    fn test() {
        let v = pae_vec([]);
        assert_eq!(v, b"\x00\x00\x00\x00\x00\x00\x00\x00");

        let v = pae_vec([&[b""]]);
        assert_eq!(
            v,
            b"\x01\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00"
        );

        let v = pae_vec([&[b"test"]]);
        assert_eq!(
            v,
            b"\x01\x00\x00\x00\x00\x00\x00\x00\x04\x00\x00\x00\x00\x00\x00\x00test"
        );
    }

    #[test]
    fn boundaries_are_not_ambiguous() {
        assert_ne!(pae_vec([&[b"ab"], &[b"c"]]), pae_vec([&[b"a"], &[b"bc"]]));
        assert_ne!(pae_vec([&[b"abc"]]), pae_vec([&[b"abc"], &[b""]]));
        assert_ne!(pae_vec([&[b""]]), pae_vec([]));
    }

    #[test]
    fn split_pieces_are_concatenated() {
        assert_eq!(
            pae_vec([&[b"v2", b".enc."], &[b"nonce"]]),
            pae_vec([&[b"v2.enc."], &[b"nonce"]]),
        );
    }

    #[test]
    fn streams_into_any_sink() {
        struct Count(usize);
        impl WriteBytes for Count {
            fn write(&mut self, slice: &[u8]) {
                self.0 += slice.len();
            }
        }

        let mut count = Count(0);
        super::pre_auth_encode([&[b"v1.auth."], &[b"payload"], &[b""]], &mut count);
        assert_eq!(count.0, 8 + 8 + 8 + 8 + 7 + 8);
    }
}
