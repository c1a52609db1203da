use async_trait::async_trait;
use ritra_error::RitraResult;
use ritra_interface::TitleResolver;

/// Resolver that needs no lookup service.
///
/// A non-blank reference is taken as the title itself; otherwise the
/// configured default (if any) is returned.
///
/// # Examples
///
/// ```
/// use ritra_interface::TitleResolver;
/// use ritra_services::StaticTitleResolver;
///
/// # async fn example() -> ritra_error::RitraResult<()> {
/// let resolver = StaticTitleResolver::new(Some("Dune".to_string()));
/// assert_eq!(resolver.lookup(None).await?, Some("Dune".to_string()));
/// assert_eq!(resolver.lookup(Some("Emma")).await?, Some("Emma".to_string()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticTitleResolver {
    default_title: Option<String>,
}

impl StaticTitleResolver {
    /// Create a resolver with an optional default title.
    pub fn new(default_title: Option<String>) -> Self {
        Self { default_title }
    }
}

#[async_trait]
impl TitleResolver for StaticTitleResolver {
    async fn lookup(&self, reference: Option<&str>) -> RitraResult<Option<String>> {
        let title = reference
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .or_else(|| self.default_title.clone())
            .filter(|t| !t.trim().is_empty());
        Ok(title)
    }

    fn name(&self) -> &str {
        "static"
    }
}
