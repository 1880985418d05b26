//! Shared catalogue fixture for unit tests.

use console_dns_core::{
    Record, RecordA, RecordAaaa, RecordCaa, RecordCname, RecordMx, RecordNs, RecordSoa,
    RecordSrv, RecordTxt, Zone, ZoneSet,
};

pub fn a(ip: &str, ttl: u32) -> RecordA {
    RecordA {
        ip: ip.parse().unwrap(),
        ttl,
    }
}

pub fn txt(text: impl Into<String>, ttl: u32) -> RecordTxt {
    RecordTxt {
        text: text.into(),
        ttl,
    }
}

/// `example.com` with apex, exact, wildcard and referral records, plus the
/// nested zone `sub.example.com`.
pub fn catalogue() -> ZoneSet {
    let apex = Record {
        soa: Some(RecordSoa {
            mname: "ns1.example.com".into(),
            rname: "admin.example.com".into(),
            serial: 2024_01_01,
            refresh: 3600,
            retry: 900,
            expire: 604_800,
            minimum: 300,
            ttl: 3600,
        }),
        ns: vec![RecordNs {
            host: "ns1.example.com".into(),
            ttl: 3600,
        }],
        mx: vec![RecordMx {
            host: "mail.example.com".into(),
            preference: 10,
            ttl: 300,
        }],
        txt: vec![txt("apex", 60)],
        caa: vec![RecordCaa {
            flag: 0,
            tag: "issue".into(),
            value: "letsencrypt.org".into(),
        }],
        ..Record::default()
    };

    let example = Zone::new("example.com")
        .with_record("@", apex)
        .with_record(
            "www",
            Record {
                a: vec![a("1.2.3.4", 300)],
                ..Record::default()
            },
        )
        .with_record(
            "*.bar",
            Record {
                a: vec![a("5.6.7.8", 60)],
                ..Record::default()
            },
        )
        .with_record(
            "txt.bar",
            Record {
                txt: vec![txt("only text here", 60)],
                ..Record::default()
            },
        )
        .with_record(
            "ns1",
            Record {
                a: vec![a("10.0.0.1", 3600)],
                aaaa: vec![RecordAaaa {
                    ip: "2001:db8::1".parse().unwrap(),
                    ttl: 3600,
                }],
                ..Record::default()
            },
        )
        .with_record(
            "mail",
            Record {
                a: vec![a("10.0.0.2", 300)],
                ..Record::default()
            },
        )
        .with_record(
            "_sip._tcp",
            Record {
                srv: vec![RecordSrv {
                    target: "sip.example.com".into(),
                    priority: 10,
                    weight: 5,
                    port: 5060,
                    ttl: 300,
                }],
                ..Record::default()
            },
        )
        .with_record(
            "sip",
            Record {
                a: vec![a("10.0.0.3", 300)],
                ..Record::default()
            },
        )
        .with_record(
            "alias",
            Record {
                cname: vec![RecordCname {
                    host: "www.example.com".into(),
                    ttl: 120,
                }],
                ..Record::default()
            },
        )
        .with_record(
            "long",
            Record {
                txt: vec![txt("x".repeat(600), 60)],
                ..Record::default()
            },
        );

    let sub = Zone::new("sub.example.com")
        .with_record(
            "@",
            Record {
                a: vec![a("9.9.9.9", 30)],
                ..Record::default()
            },
        )
        .with_record(
            "www",
            Record {
                a: vec![a("9.9.9.10", 30)],
                ..Record::default()
            },
        );

    ZoneSet::new([example, sub]).with_etag(Some("\"v1\"".into()))
}
