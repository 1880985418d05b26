//! Resource record synthesis for a resolved query.

use console_dns_core::{RecordCaa, RecordKind, RecordSoa, ZoneSet};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, MX, NS, NULL, SOA, SRV, TXT};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use tracing::warn;

use super::{resolve, Resolution};

/// Longest character-string a TXT record can carry in one segment.
pub const TXT_SEGMENT: usize = 255;

/// Records for the answer and additional sections of one response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answer {
    pub answers: Vec<Record>,
    pub extras: Vec<Record>,
}

impl Answer {
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty() && self.extras.is_empty()
    }
}

/// Build the records answering `resolution`, owned by the query name.
///
/// NS, MX and SRV answers pull A and AAAA glue for their hosts from the same
/// snapshot. Glue that does not resolve is left out.
pub fn build(zones: &ZoneSet, resolution: &Resolution, owner: &Name) -> Answer {
    synthesize(zones, resolution, owner, true)
}

/// Split a TXT value into wire segments by byte.
pub fn split_txt(text: &str) -> Vec<&[u8]> {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return vec![bytes];
    }
    bytes.chunks(TXT_SEGMENT).collect()
}

fn synthesize(zones: &ZoneSet, resolution: &Resolution, owner: &Name, with_glue: bool) -> Answer {
    let mut out = Answer::default();
    let Some(zone) = zones.zone(&resolution.zone) else {
        return out;
    };

    // SOA describes the zone itself.
    if resolution.kind == RecordKind::Soa {
        if let Some(record) = zone
            .apex()
            .and_then(|apex| apex.soa.as_ref())
            .and_then(|soa| soa_record(zone.name(), soa))
        {
            out.answers.push(record);
        }
        return out;
    }

    let Some(record) = zone.record(&resolution.key) else {
        return out;
    };
    let with_glue = with_glue && resolution.kind.is_referral();
    let answer = |ttl: u32, rdata: RData| Record::from_rdata(owner.clone(), ttl, rdata);

    match resolution.kind {
        RecordKind::A => {
            out.answers
                .extend(record.a.iter().map(|e| answer(e.ttl, RData::A(A(e.ip)))));
        }
        RecordKind::Aaaa => {
            out.answers
                .extend(record.aaaa.iter().map(|e| answer(e.ttl, RData::AAAA(AAAA(e.ip)))));
        }
        RecordKind::Txt => {
            out.answers.extend(record.txt.iter().map(|e| {
                answer(e.ttl, RData::TXT(TXT::from_bytes(split_txt(&e.text))))
            }));
        }
        RecordKind::Cname => {
            for entry in &record.cname {
                if let Some(target) = fqdn(&entry.host) {
                    out.answers.push(answer(entry.ttl, RData::CNAME(CNAME(target))));
                }
            }
        }
        RecordKind::Ns => {
            for entry in &record.ns {
                let Some(host) = fqdn(&entry.host) else { continue };
                out.answers.push(answer(entry.ttl, RData::NS(NS(host.clone()))));
                if with_glue {
                    out.extras.extend(glue(zones, &host));
                }
            }
        }
        RecordKind::Mx => {
            for entry in &record.mx {
                let Some(host) = fqdn(&entry.host) else { continue };
                out.answers.push(answer(
                    entry.ttl,
                    RData::MX(MX::new(entry.preference, host.clone())),
                ));
                if with_glue {
                    out.extras.extend(glue(zones, &host));
                }
            }
        }
        RecordKind::Srv => {
            for entry in &record.srv {
                let Some(target) = fqdn(&entry.target) else { continue };
                out.answers.push(answer(
                    entry.ttl,
                    RData::SRV(SRV::new(
                        entry.priority,
                        entry.weight,
                        entry.port,
                        target.clone(),
                    )),
                ));
                if with_glue {
                    out.extras.extend(glue(zones, &target));
                }
            }
        }
        RecordKind::Caa => {
            // CAA entries carry no TTL.
            out.answers
                .extend(record.caa.iter().filter_map(caa_rdata).map(|rdata| answer(0, rdata)));
        }
        RecordKind::Soa => {}
    }

    out
}

/// A and AAAA records for `host`, without further glue.
fn glue(zones: &ZoneSet, host: &Name) -> Vec<Record> {
    let name = host.to_ascii();
    [RecordType::A, RecordType::AAAA]
        .into_iter()
        .filter_map(|rtype| resolve(zones, &name, rtype).ok())
        .flat_map(|resolution| synthesize(zones, &resolution, host, false).answers)
        .collect()
}

fn soa_record(zone: &str, soa: &RecordSoa) -> Option<Record> {
    let origin = fqdn(zone)?;
    let rdata = SOA::new(
        fqdn(&soa.mname)?,
        fqdn(&soa.rname)?,
        soa.serial,
        seconds(soa.refresh),
        seconds(soa.retry),
        seconds(soa.expire),
        soa.minimum,
    );
    Some(Record::from_rdata(origin, soa.ttl, RData::SOA(rdata)))
}

/// SOA timers are signed on the wire model.
fn seconds(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// CAA rdata in wire form: flags, tag length, tag, value.
fn caa_rdata(caa: &RecordCaa) -> Option<RData> {
    let Ok(tag_len) = u8::try_from(caa.tag.len()) else {
        warn!(tag = %caa.tag, "skipping CAA entry with oversized tag");
        return None;
    };
    let mut wire = Vec::with_capacity(2 + caa.tag.len() + caa.value.len());
    wire.push(caa.flag);
    wire.push(tag_len);
    wire.extend_from_slice(caa.tag.as_bytes());
    wire.extend_from_slice(caa.value.as_bytes());
    Some(RData::Unknown {
        code: RecordType::CAA,
        rdata: NULL::with(wire),
    })
}

fn fqdn(host: &str) -> Option<Name> {
    match Name::from_ascii(host) {
        Ok(mut name) => {
            name.set_fqdn(true);
            Some(name)
        }
        Err(e) => {
            warn!(host, error = %e, "skipping entry with invalid host name");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::catalogue;
    use console_dns_core::{Record as Entry, RecordCname, RecordNs, Zone};
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn name(s: &str) -> Name {
        Name::from_ascii(s).unwrap()
    }

    fn answer_for(zones: &ZoneSet, qname: &str, rtype: RecordType) -> Answer {
        let resolution = resolve(zones, qname, rtype).unwrap();
        build(zones, &resolution, &name(qname))
    }

    #[test]
    fn test_exact_a_record() {
        let zones = catalogue();
        let answer = answer_for(&zones, "www.example.com.", RecordType::A);

        assert_eq!(
            answer.answers,
            vec![Record::from_rdata(
                name("www.example.com."),
                300,
                RData::A(A(Ipv4Addr::new(1, 2, 3, 4)))
            )]
        );
        assert!(answer.extras.is_empty());
    }

    #[test]
    fn test_wildcard_answer_owned_by_query_name() {
        let zones = catalogue();
        let answer = answer_for(&zones, "foo.bar.example.com.", RecordType::A);

        assert_eq!(
            answer.answers,
            vec![Record::from_rdata(
                name("foo.bar.example.com."),
                60,
                RData::A(A(Ipv4Addr::new(5, 6, 7, 8)))
            )]
        );
    }

    #[test]
    fn test_owner_keeps_query_case() {
        let zones = catalogue();
        let resolution = resolve(&zones, "WWW.Example.com.", RecordType::A).unwrap();
        let answer = build(&zones, &resolution, &name("WWW.Example.com."));
        assert_eq!(answer.answers[0].name().to_string(), "WWW.Example.com.");
    }

    #[test]
    fn test_split_txt_600_bytes() {
        let text = "x".repeat(600);
        let lengths: Vec<usize> = split_txt(&text).iter().map(|s| s.len()).collect();
        assert_eq!(lengths, vec![255, 255, 90]);
    }

    #[test]
    fn test_split_txt_boundaries() {
        assert_eq!(split_txt(""), vec![b"" as &[u8]]);
        assert_eq!(split_txt(&"a".repeat(254)).len(), 1);
        assert_eq!(split_txt(&"a".repeat(255)).len(), 1);
        let lengths: Vec<usize> = split_txt(&"a".repeat(256)).iter().map(|s| s.len()).collect();
        assert_eq!(lengths, vec![255, 1]);
        // Multi-byte characters are cut by byte, not by char.
        let lengths: Vec<usize> = split_txt(&"é".repeat(200)).iter().map(|s| s.len()).collect();
        assert_eq!(lengths, vec![255, 145]);
    }

    #[test]
    fn test_long_txt_record() {
        let zones = catalogue();
        let answer = answer_for(&zones, "long.example.com.", RecordType::TXT);
        let text = "x".repeat(600);

        assert_eq!(
            answer.answers,
            vec![Record::from_rdata(
                name("long.example.com."),
                60,
                RData::TXT(TXT::from_bytes(split_txt(&text)))
            )]
        );
    }

    #[test]
    fn test_cname_target_is_fully_qualified() {
        let zones = catalogue();
        let answer = answer_for(&zones, "alias.example.com.", RecordType::CNAME);

        assert_eq!(
            answer.answers,
            vec![Record::from_rdata(
                name("alias.example.com."),
                120,
                RData::CNAME(CNAME(name("www.example.com.")))
            )]
        );
        assert!(answer.extras.is_empty());
    }

    #[test]
    fn test_ns_with_glue() {
        let zones = catalogue();
        let answer = answer_for(&zones, "example.com.", RecordType::NS);

        assert_eq!(
            answer.answers,
            vec![Record::from_rdata(
                name("example.com."),
                3600,
                RData::NS(NS(name("ns1.example.com.")))
            )]
        );
        assert_eq!(
            answer.extras,
            vec![
                Record::from_rdata(
                    name("ns1.example.com."),
                    3600,
                    RData::A(A(Ipv4Addr::new(10, 0, 0, 1)))
                ),
                Record::from_rdata(
                    name("ns1.example.com."),
                    3600,
                    RData::AAAA(AAAA("2001:db8::1".parse::<Ipv6Addr>().unwrap()))
                ),
            ]
        );
    }

    #[test]
    fn test_mx_glue_skips_missing_family() {
        let zones = catalogue();
        let answer = answer_for(&zones, "example.com.", RecordType::MX);

        assert_eq!(
            answer.answers,
            vec![Record::from_rdata(
                name("example.com."),
                300,
                RData::MX(MX::new(10, name("mail.example.com.")))
            )]
        );
        // `mail` has an A record but no AAAA anywhere on its fallback chain.
        assert_eq!(
            answer.extras,
            vec![Record::from_rdata(
                name("mail.example.com."),
                300,
                RData::A(A(Ipv4Addr::new(10, 0, 0, 2)))
            )]
        );
    }

    #[test]
    fn test_srv_with_glue() {
        let zones = catalogue();
        let answer = answer_for(&zones, "_sip._tcp.example.com.", RecordType::SRV);

        assert_eq!(
            answer.answers,
            vec![Record::from_rdata(
                name("_sip._tcp.example.com."),
                300,
                RData::SRV(SRV::new(10, 5, 5060, name("sip.example.com.")))
            )]
        );
        assert_eq!(answer.extras.len(), 1);
        assert_eq!(answer.extras[0].record_type(), RecordType::A);
    }

    #[test]
    fn test_glue_outside_catalogue_is_silent() {
        let zones = ZoneSet::new([Zone::new("example.org").with_record(
            "@",
            Entry {
                ns: vec![RecordNs {
                    host: "ns.elsewhere.net".into(),
                    ttl: 600,
                }],
                ..Entry::default()
            },
        )]);
        let answer = answer_for(&zones, "example.org.", RecordType::NS);

        assert_eq!(answer.answers.len(), 1);
        assert!(answer.extras.is_empty());
    }

    #[test]
    fn test_invalid_host_is_skipped() {
        let bad = format!("{}.example.org", "a".repeat(64));
        let zones = ZoneSet::new([Zone::new("example.org").with_record(
            "alias",
            Entry {
                cname: vec![
                    RecordCname {
                        host: bad,
                        ttl: 60,
                    },
                    RecordCname {
                        host: "good.example.org".into(),
                        ttl: 60,
                    },
                ],
                ..Entry::default()
            },
        )]);
        let answer = answer_for(&zones, "alias.example.org.", RecordType::CNAME);

        assert_eq!(
            answer.answers,
            vec![Record::from_rdata(
                name("alias.example.org."),
                60,
                RData::CNAME(CNAME(name("good.example.org.")))
            )]
        );
    }

    #[test]
    fn test_caa_has_zero_ttl_and_wire_rdata() {
        let zones = catalogue();
        let answer = answer_for(&zones, "example.com.", RecordType::CAA);

        let mut wire = vec![0_u8, 5];
        wire.extend_from_slice(b"issue");
        wire.extend_from_slice(b"letsencrypt.org");
        assert_eq!(
            answer.answers,
            vec![Record::from_rdata(
                name("example.com."),
                0,
                RData::Unknown {
                    code: RecordType::CAA,
                    rdata: NULL::with(wire)
                }
            )]
        );
        assert_eq!(answer.answers[0].record_type(), RecordType::CAA);
    }

    #[test]
    fn test_soa_owned_by_zone() {
        let zones = catalogue();
        let answer = answer_for(&zones, "www.example.com.", RecordType::SOA);

        assert_eq!(
            answer.answers,
            vec![Record::from_rdata(
                name("example.com."),
                3600,
                RData::SOA(SOA::new(
                    name("ns1.example.com."),
                    name("admin.example.com."),
                    2024_01_01,
                    3600,
                    900,
                    604_800,
                    300
                ))
            )]
        );
        assert!(answer.extras.is_empty());
    }

    #[test]
    fn test_soa_missing_gives_empty_answer() {
        let zones = catalogue();
        let resolution = Resolution {
            zone: "sub.example.com".into(),
            key: "@".into(),
            kind: RecordKind::Soa,
        };
        assert!(build(&zones, &resolution, &name("sub.example.com.")).is_empty());
    }

    #[test]
    fn test_soa_timer_clamped() {
        assert_eq!(seconds(3600), 3600);
        assert_eq!(seconds(u32::MAX), i32::MAX);
    }

    #[test]
    fn test_deterministic() {
        let zones = catalogue();
        assert_eq!(
            answer_for(&zones, "example.com.", RecordType::NS),
            answer_for(&zones, "example.com.", RecordType::NS)
        );
    }
}
