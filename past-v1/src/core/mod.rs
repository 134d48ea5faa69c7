mod auth;
mod enc;
mod sign;

use past_core::header::ProtocolVersion;
use past_core::version;

pub struct V1;

#[derive(Clone)]
pub struct SecretKey(rsa::pss::SigningKey<sha2::Sha384>);

#[derive(Clone)]
pub struct PublicKey(rsa::pss::VerifyingKey<sha2::Sha384>);

impl version::Version for V1 {
    const VERSION: ProtocolVersion = ProtocolVersion::V1;
    const HEADER: &'static str = "v1";
}

struct PreAuthEncodeDigest<'a, M: digest::Update>(pub &'a mut M);
impl<M: digest::Update> past_core::pae::WriteBytes for PreAuthEncodeDigest<'_, M> {
    fn write(&mut self, slice: &[u8]) {
        self.0.update(slice);
    }
}

/// The PAE header piece, `v1.auth.` and friends.
fn header<P: version::Purpose>() -> [&'static [u8]; 2] {
    use past_core::version::Version;

    [V1::HEADER.as_bytes(), P::HEADER.as_bytes()]
}
