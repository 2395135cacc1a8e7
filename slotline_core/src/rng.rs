use hmac::{Hmac, Mac};
use rand_core::{impls, Error, RngCore};
use sha2::Sha256;

// Provably-fair byte stream:
// HMAC-SHA256(server_seed, "client_seed:nonce:round") for round = 0, 1, 2, ...
// The server publishes sha256(server_seed) before the spin and reveals the seed after.

pub type HmacSha256 = Hmac<Sha256>;

pub fn derive_hash_hex(input: &[u8]) -> String {
    use sha2::Digest;
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone)]
pub struct ProvablyFairRng {
    pub server_seed: String, // secret
    pub client_seed: String,
    pub nonce: u64,
    round: u64,
    block: [u8; 32],
    cursor: usize,
}

impl ProvablyFairRng {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        let mut rng = Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
            round: 0,
            block: [0u8; 32],
            cursor: 0,
        };
        rng.block = rng.hmac_bytes(0);
        rng
    }

    pub fn server_seed_hash_hex(&self) -> String {
        derive_hash_hex(self.server_seed.as_bytes())
    }

    pub fn hmac_bytes(&self, round: u64) -> [u8; 32] {
        // HMAC accepts keys of any length
        let mut mac = HmacSha256::new_from_slice(self.server_seed.as_bytes()).expect("HMAC key");
        let msg = format!("{}:{}:{}", self.client_seed, self.nonce, round);
        mac.update(msg.as_bytes());
        let res = mac.finalize().into_bytes();
        let mut out = [0u8; 32];
        out.copy_from_slice(&res);
        out
    }

    fn refill(&mut self) {
        self.round += 1;
        self.block = self.hmac_bytes(self.round);
        self.cursor = 0;
    }
}

impl RngCore for ProvablyFairRng {
    fn next_u32(&mut self) -> u32 {
        if self.cursor + 4 > self.block.len() {
            self.refill();
        }
        let chunk = &self.block[self.cursor..self.cursor + 4];
        self.cursor += 4;
        u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
