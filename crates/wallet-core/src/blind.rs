//! Client-side BDHKE primitives (NUT-00) over secp256k1.
//!
//! The mint signs blinded points; this module produces the blinded outputs
//! for a swap and unblinds the returned signatures. Point encodings are
//! 33-byte SEC1 compressed, hex on the wire.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{ProjectivePoint, PublicKey, Scalar, SecretKey};
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::WalletError;

const HASH_TO_CURVE_DOMAIN: &[u8] = b"Secp256k1_HashToCurve_Cashu_";

/// Map a proof secret onto a curve point (NUT-00 `hash_to_curve`).
pub fn hash_to_curve(message: &[u8]) -> Result<ProjectivePoint, WalletError> {
    let msg_hash = Sha256::digest([HASH_TO_CURVE_DOMAIN, message].concat());
    for counter in 0u32..=u16::MAX as u32 {
        let mut hasher = Sha256::new();
        hasher.update(msg_hash);
        hasher.update(counter.to_le_bytes());
        let digest = hasher.finalize();
        let mut candidate = [0u8; 33];
        candidate[0] = 0x02;
        candidate[1..].copy_from_slice(&digest);
        if let Ok(key) = PublicKey::from_sec1_bytes(&candidate) {
            return Ok(key.to_projective());
        }
    }
    Err(WalletError::Decode(
        "hash_to_curve exhausted counter space".into(),
    ))
}

/// Hex of the Y point the mint tracks spend state under.
pub fn proof_y_hex(secret: &str) -> Result<String, WalletError> {
    Ok(point_to_hex(&hash_to_curve(secret.as_bytes())?))
}

pub fn point_to_hex(point: &ProjectivePoint) -> String {
    hex::encode(point.to_affine().to_encoded_point(true).as_bytes())
}

pub fn point_from_hex(value: &str) -> Result<ProjectivePoint, WalletError> {
    let bytes =
        hex::decode(value.trim()).map_err(|e| WalletError::Decode(format!("point hex: {e}")))?;
    let key = PublicKey::from_sec1_bytes(&bytes)
        .map_err(|e| WalletError::Decode(format!("point sec1: {e}")))?;
    Ok(key.to_projective())
}

/// One blinded output awaiting a mint signature. Holds the blinding factor
/// needed to unblind the response.
pub struct PremintSecret {
    pub amount: u64,
    pub secret: String,
    pub b_hex: String,
    r: Scalar,
}

impl PremintSecret {
    pub fn blinding_factor(&self) -> &Scalar {
        &self.r
    }
}

/// Decompose `amount` into power-of-two denominations, ascending.
pub fn split_amount(amount: u64) -> Vec<u64> {
    (0..u64::BITS)
        .map(|bit| amount & (1 << bit))
        .filter(|part| *part > 0)
        .collect()
}

/// Fresh random secret, 32 bytes hex.
pub fn random_secret<R: RngCore + CryptoRng>(rng: &mut R) -> String {
    let mut bytes = Zeroizing::new([0u8; 32]);
    rng.fill_bytes(bytes.as_mut());
    hex::encode(bytes.as_ref())
}

/// Produce blinded outputs covering `amount`: for each denomination, a fresh
/// secret and `B_ = hash_to_curve(secret) + r*G`.
pub fn premint_secrets<R: RngCore + CryptoRng>(
    amount: u64,
    rng: &mut R,
) -> Result<Vec<PremintSecret>, WalletError> {
    let mut outputs = Vec::new();
    for denomination in split_amount(amount) {
        let secret = random_secret(rng);
        let r = *SecretKey::random(rng).to_nonzero_scalar();
        let y = hash_to_curve(secret.as_bytes())?;
        let blinded = y + ProjectivePoint::GENERATOR * r;
        outputs.push(PremintSecret {
            amount: denomination,
            secret,
            b_hex: point_to_hex(&blinded),
            r,
        });
    }
    Ok(outputs)
}

/// Unblind a mint signature: `C = C_ - r*K` where `K` is the mint's key for
/// the denomination. Returns hex of the compressed point.
pub fn unblind_signature(
    c_blinded_hex: &str,
    r: &Scalar,
    mint_key_hex: &str,
) -> Result<String, WalletError> {
    let c_blinded = point_from_hex(c_blinded_hex)?;
    let mint_key = point_from_hex(mint_key_hex)?;
    let unblinded = c_blinded - mint_key * *r;
    Ok(point_to_hex(&unblinded))
}
