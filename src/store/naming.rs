/// Computes the bucket name from the configured seed name.
///
/// Must be pure and must not fail. Closures `Fn(&str) -> String` are
/// naming strategies.
pub trait NamingStrategy: Send + Sync {
    fn name(&self, seed: &str) -> String;
}

/// Uses the seed unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNaming;

impl NamingStrategy for IdentityNaming {
    fn name(&self, seed: &str) -> String {
        seed.to_string()
    }
}

impl<F> NamingStrategy for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn name(&self, seed: &str) -> String {
        self(seed)
    }
}
