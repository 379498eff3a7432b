use crc32fast::Hasher;

/// Derive a short, stable seed from a tenant id using CRC32
pub fn tenant_seed(tenant_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(format!("store://{}", tenant_id).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for sections and blocks within one layout
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Tenant seed (CRC32)
    count: u64,   // Sequential counter
}

impl IdGenerator {
    pub fn new(tenant_id: &str) -> Self {
        Self {
            seed: tenant_seed(tenant_id),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self, prefix: &str) -> String {
        self.count += 1;
        format!("{}-{}-{}", prefix, self.seed, self.count)
    }

    /// Generate the next ID for which `taken` is false
    pub fn fresh_id(&mut self, prefix: &str, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let id = self.new_id(prefix);
            if !taken(&id) {
                return id;
            }
        }
    }

    /// Fast-forward past counters already used by `existing` ids with this seed.
    ///
    /// Collisions are still checked by [`IdGenerator::fresh_id`]; this only
    /// avoids walking through every id a previous session handed out.
    pub fn resume_after<'a>(&mut self, existing: impl IntoIterator<Item = &'a str>) {
        let marker = format!("-{}-", self.seed);
        for id in existing {
            if let Some(pos) = id.rfind(&marker) {
                if let Ok(n) = id[pos + marker.len()..].parse::<u64>() {
                    self.count = self.count.max(n);
                }
            }
        }
    }

    /// Get tenant seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}
