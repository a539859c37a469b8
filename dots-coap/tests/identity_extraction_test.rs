// SPDX-License-Identifier: BSD-2-Clause
/*
 * Copyright © The dots-coap Contributors, all rights reserved.
 * This file is part of the dots-coap project, see the README file for
 * general information on this project and the NOTICE.md and LICENSE files
 * for information regarding copyright ownership and terms of use.
 *
 * identity_extraction_test.rs - Tests for extracting identities from peer certificates.
 */

use dots_coap::crypto::pki::{extract, IdentitySource, SanEntry};

use crate::common::FakeCertificate;

mod common;

fn names(cert: &FakeCertificate, cn: &str) -> Vec<(String, IdentitySource)> {
    extract(cert, cn)
        .map(|c| (c.name().to_string(), c.source()))
        .collect()
}

#[test]
pub fn dns_names_are_yielded_in_certificate_order() {
    let cert = FakeCertificate::with_dns_names(&["a.example.com", "b.example.com"]);
    assert_eq!(
        names(&cert, "ignored"),
        vec![
            ("a.example.com".to_string(), IdentitySource::SubjectAltName),
            ("b.example.com".to_string(), IdentitySource::SubjectAltName),
        ]
    );
}

#[test]
pub fn embedded_nul_entries_are_skipped() {
    common::init_logging();
    let cert = FakeCertificate {
        sans: Some(vec![
            SanEntry::dns(&b"evil.example.com\0.attacker.org"[..]),
            SanEntry::Other,
            SanEntry::dns("good.example.com"),
        ]),
        cn: None,
    };
    assert_eq!(
        names(&cert, "client1"),
        vec![("good.example.com".to_string(), IdentitySource::SubjectAltName)]
    );

    let only_truncated = FakeCertificate {
        sans: Some(vec![SanEntry::dns(&b"a.example.com\0"[..])]),
        cn: None,
    };
    assert!(names(&only_truncated, "client1").is_empty());
}

#[test]
pub fn missing_extension_falls_back_to_common_name() {
    let cert = FakeCertificate::with_common_name("from-certificate");
    assert_eq!(
        names(&cert, "client1"),
        vec![("client1".to_string(), IdentitySource::CommonName)]
    );
}

#[test]
pub fn extension_without_dns_names_yields_nothing() {
    let cert = FakeCertificate {
        sans: Some(vec![SanEntry::Other, SanEntry::Other]),
        cn: Some("client1".to_string()),
    };
    assert!(names(&cert, "client1").is_empty());

    let empty = FakeCertificate {
        sans: Some(Vec::new()),
        cn: None,
    };
    assert_eq!(extract(&empty, "client1").count(), 0);
}

#[cfg(feature = "dtls-pki")]
mod x509 {
    use dots_coap::{
        crypto::pki::{extract, DerCertificate, IdentitySource, PeerCertificate, SanEntry},
        error::CertificateParseError,
    };
    use rcgen::{Certificate, CertificateParams, DistinguishedName, DnType, DnValue};

    fn generate_with_cn_value(cn: DnValue) -> DerCertificate {
        let mut params = CertificateParams::new(Vec::<String>::new());
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, cn);
        params.distinguished_name = dn;
        let der = Certificate::from_params(params).unwrap().serialize_der().unwrap();
        DerCertificate::from_der(der).unwrap()
    }

    fn generate(dns_names: &[&str], cn: &str) -> Certificate {
        let mut params = CertificateParams::new(dns_names.iter().map(|n| n.to_string()).collect::<Vec<_>>());
        let mut dn = DistinguishedName::new();
        dn.push(DnType::CommonName, cn.to_string());
        params.distinguished_name = dn;
        Certificate::from_params(params).unwrap()
    }

    #[test]
    pub fn reads_subject_alt_names_and_common_name() {
        let cert = generate(&["a.example.com", "b.example.com"], "client1");
        let der = DerCertificate::from_der(cert.serialize_der().unwrap()).unwrap();

        assert_eq!(
            der.subject_alt_names(),
            Some(vec![SanEntry::dns("a.example.com"), SanEntry::dns("b.example.com")])
        );
        assert_eq!(der.common_name().as_deref(), Some("client1"));

        let candidates: Vec<_> = extract(&der, "client1").collect();
        assert_eq!(candidates.len(), 2);
        assert!(candidates
            .iter()
            .all(|c| c.source() == IdentitySource::SubjectAltName));
    }

    #[test]
    pub fn decodes_wide_common_name_strings() {
        let bmp = "client1".encode_utf16().flat_map(u16::to_be_bytes).collect();
        let der = generate_with_cn_value(DnValue::BmpString(bmp));
        assert_eq!(der.common_name().as_deref(), Some("client1"));
        assert_eq!(
            extract(&der, "client1").map(|c| c.name().to_string()).collect::<Vec<_>>(),
            vec!["client1".to_string()]
        );

        let universal = "client2".chars().flat_map(|c| u32::from(c).to_be_bytes()).collect();
        let der = generate_with_cn_value(DnValue::UniversalString(universal));
        assert_eq!(der.common_name().as_deref(), Some("client2"));

        let der = generate_with_cn_value(DnValue::TeletexString(b"client3".to_vec()));
        assert_eq!(der.common_name().as_deref(), Some("client3"));
    }

    #[test]
    pub fn parses_pem() {
        let cert = generate(&["peer.example.com"], "peer");
        let pem = cert.serialize_pem().unwrap();

        let parsed = DerCertificate::from_pem(pem).unwrap();
        assert_eq!(DerCertificate::from_der(parsed.as_der()).unwrap(), parsed);
        assert_eq!(parsed.subject_alt_names(), Some(vec![SanEntry::dns("peer.example.com")]));
        assert_eq!(parsed.common_name().as_deref(), Some("peer"));
    }

    #[test]
    pub fn rejects_invalid_encodings() {
        assert_eq!(
            DerCertificate::from_der(vec![0x30, 0x03, 0x01, 0x02]),
            Err(CertificateParseError::InvalidDer)
        );
        assert_eq!(
            DerCertificate::from_pem("not a certificate"),
            Err(CertificateParseError::InvalidPem)
        );
        assert!(DerCertificate::try_from(&[][..]).is_err());
    }
}
