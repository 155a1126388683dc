mod util;

use certaide::config::CertConfig;
use openssl::nid::Nid;
use openssl::x509::X509;

fn common_name(name: &openssl::x509::X509NameRef) -> String {
    name.entries_by_nid(Nid::COMMONNAME)
        .next()
        .unwrap()
        .data()
        .as_utf8()
        .unwrap()
        .to_string()
}

#[test]
fn test_openssl_parses_root() {
    let ca = util::root_ca();
    let x509 = X509::from_pem(ca.certificate_pem().unwrap().as_bytes()).expect("Failed to parse PEM");

    assert_eq!(x509.version(), 2, "X509 version should be 3 (0-based index)");
    assert_eq!(common_name(x509.subject_name()), "Root CA");
    assert_eq!(common_name(x509.issuer_name()), "Root CA");
    assert_eq!(
        x509.signature_algorithm().object().nid(),
        Nid::SHA256WITHRSAENCRYPTION
    );

    let public_key = x509.public_key().unwrap();
    assert_eq!(public_key.bits(), 4096);
    assert!(x509.verify(&public_key).unwrap(), "root must be self-signed");
}

#[test]
fn test_openssl_verifies_leaf_against_root() {
    let ca = util::root_ca();
    let leaf = ca
        .issue_leaf(&["server.example", "192.168.0.10"], &CertConfig::default())
        .unwrap();

    let root = X509::from_pem(ca.certificate_pem().unwrap().as_bytes()).unwrap();
    let x509 = X509::from_pem(leaf.certificate_pem.as_bytes()).unwrap();

    assert_eq!(common_name(x509.subject_name()), "server.example");
    assert_eq!(common_name(x509.issuer_name()), "Root CA");
    assert!(x509.verify(&root.public_key().unwrap()).unwrap());

    let sans = x509.subject_alt_names().unwrap();
    assert_eq!(sans.len(), 2);
    assert_eq!(sans.get(0).unwrap().dnsname(), Some("server.example"));
    assert_eq!(sans.get(1).unwrap().ipaddress(), Some(&[192u8, 168, 0, 10][..]));

    let key = openssl::pkey::PKey::private_key_from_pem(leaf.private_key_pem.as_bytes()).unwrap();
    assert_eq!(key.bits(), 2048);
    assert!(x509.public_key().unwrap().public_eq(&key));
}

#[test]
fn test_openssl_chain_verification() {
    use openssl::stack::Stack;
    use openssl::x509::X509StoreContext;
    use openssl::x509::store::X509StoreBuilder;

    let ca = util::root_ca();
    let leaf = ca.issue_leaf(&["chain.example"], &CertConfig::default()).unwrap();

    let root = X509::from_pem(ca.certificate_pem().unwrap().as_bytes()).unwrap();
    let x509 = X509::from_pem(leaf.certificate_pem.as_bytes()).unwrap();

    let mut store = X509StoreBuilder::new().unwrap();
    store.add_cert(root).unwrap();
    let store = store.build();

    let chain: Stack<X509> = Stack::new().unwrap();
    let mut context = X509StoreContext::new().unwrap();
    let (verified, result) = context
        .init(&store, &x509, &chain, |c| {
            let verified = c.verify_cert()?;
            Ok((verified, c.error()))
        })
        .unwrap();
    assert!(verified, "{}", result);
}
