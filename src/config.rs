use bon::Builder;

/// Subject branding and validity periods used when building templates.
///
/// The defaults reproduce the stock root (`O=BJCA, CN=Root CA`) and the stock
/// leaf subject (`O=CertAide, L=BeiJing, ST=BeiJing, C=CN`).
///
/// # Example
/// ```
/// use certaide::config::CertConfig;
/// let config = CertConfig::builder()
///     .organization("Example Corp".to_string())
///     .country("US".to_string())
///     .build();
/// assert_eq!(config.root_common_name, "Root CA");
/// assert_eq!(config.leaf_validity_years, 1);
/// ```
#[derive(Clone, Debug, Builder)]
pub struct CertConfig {
    #[builder(default = "BJCA".to_string())]
    pub root_organization: String,
    #[builder(default = "Root CA".to_string())]
    pub root_common_name: String,
    /// Leaf subject organization (O).
    #[builder(default = "CertAide".to_string())]
    pub organization: String,
    /// Leaf subject country (C). Must be a two-letter PrintableString.
    #[builder(default = "CN".to_string())]
    pub country: String,
    #[builder(default = "BeiJing".to_string())]
    pub locality: String,
    #[builder(default = "BeiJing".to_string())]
    pub province: String,
    #[builder(default = 100)]
    pub root_validity_years: i32,
    #[builder(default = 1)]
    pub leaf_validity_years: i32,
}

impl Default for CertConfig {
    fn default() -> Self {
        CertConfig::builder().build()
    }
}
