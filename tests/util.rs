use std::sync::OnceLock;

use certaide::authority::CertificateAuthority;
use certaide::config::CertConfig;

/// One RSA-4096 root shared by every test in the binary; generating it dominates runtime.
pub fn root_ca() -> &'static CertificateAuthority {
    static ROOT: OnceLock<CertificateAuthority> = OnceLock::new();
    ROOT.get_or_init(|| {
        CertificateAuthority::generate_root(&CertConfig::default()).expect("root generation failed")
    })
}
