mod auth;
mod enc;
mod sign;

use past_core::header::ProtocolVersion;
use past_core::version;

pub struct V2;

#[derive(Clone)]
pub struct SecretKey(ed25519_dalek::SigningKey);

#[derive(Clone)]
pub struct PublicKey(ed25519_dalek::VerifyingKey);

impl version::Version for V2 {
    const VERSION: ProtocolVersion = ProtocolVersion::V2;
    const HEADER: &'static str = "v2";
}

struct PreAuthEncodeDigest<'a, M: digest::Update>(pub &'a mut M);
impl<M: digest::Update> past_core::pae::WriteBytes for PreAuthEncodeDigest<'_, M> {
    fn write(&mut self, slice: &[u8]) {
        self.0.update(slice);
    }
}

fn header<P: version::Purpose>() -> [&'static [u8]; 2] {
    use past_core::version::Version;

    [V2::HEADER.as_bytes(), P::HEADER.as_bytes()]
}
