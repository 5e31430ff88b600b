use bacport_core::apdu::{
    ApduType, ComplexAckHeader, ConfirmedRequestHeader, SimpleAck, UnconfirmedRequestHeader,
};
use bacport_core::encoding::reader::Reader;
use bacport_core::npdu::Npdu;
use bacport_core::services::{
    IAmRequest, ReadPropertyAck, WhoIsRequest, SERVICE_I_AM, SERVICE_READ_PROPERTY,
    SERVICE_WHO_IS,
};
use std::fs;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .expect("workspace root should be resolvable")
}

fn parse_hex_fixture(path: &Path) -> Vec<u8> {
    let content = fs::read_to_string(path).expect("fixture must be readable");
    let mut out = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        for token in trimmed.split_whitespace() {
            let byte = u8::from_str_radix(token, 16)
                .unwrap_or_else(|_| panic!("invalid hex token '{token}' in {}", path.display()));
            out.push(byte);
        }
    }
    out
}

/// Walks the captured-frame corpus and runs each frame through the same
/// decode path the client uses: NPDU, APDU classification, then the
/// service body for the shapes a client receives.
#[test]
fn golden_corpus_fixtures_decode_end_to_end() {
    let fixture_dir = workspace_root().join("fixtures/golden");
    let mut fixture_files = fs::read_dir(&fixture_dir)
        .expect("fixtures directory should exist")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "hex"))
        .collect::<Vec<_>>();
    fixture_files.sort();
    assert!(
        !fixture_files.is_empty(),
        "expected at least one corpus fixture in {}",
        fixture_dir.display()
    );

    for fixture in fixture_files {
        let bytes = parse_hex_fixture(&fixture);
        assert!(
            !bytes.is_empty(),
            "fixture {} must contain at least one byte",
            fixture.display()
        );

        let mut r = Reader::new(&bytes);
        Npdu::decode(&mut r).unwrap_or_else(|e| {
            panic!(
                "fixture {} failed NPDU decode with error {e:?}",
                fixture.display()
            )
        });

        let first = r
            .peek_u8()
            .unwrap_or_else(|_| panic!("fixture {} carries no APDU", fixture.display()));
        let apdu_type = ApduType::from_first_byte(first).unwrap_or_else(|| {
            panic!(
                "fixture {} has unknown APDU type nibble 0x{:x}",
                fixture.display(),
                first >> 4
            )
        });

        let result = decode_apdu(&mut r, apdu_type);
        result.unwrap_or_else(|e| {
            panic!("fixture {} failed APDU decode: {e}", fixture.display());
        });
    }
}

fn decode_apdu(r: &mut Reader<'_>, apdu_type: ApduType) -> Result<(), String> {
    match apdu_type {
        ApduType::UnconfirmedRequest => {
            let header = UnconfirmedRequestHeader::decode(r).map_err(|e| format!("{e}"))?;
            match header.service_choice {
                SERVICE_WHO_IS => {
                    WhoIsRequest::decode_after_header(r).map_err(|e| format!("{e}"))?;
                }
                SERVICE_I_AM => {
                    IAmRequest::decode_after_header(r).map_err(|e| format!("{e}"))?;
                }
                other => return Err(format!("unexpected unconfirmed service {other:#04x}")),
            }
        }
        ApduType::ConfirmedRequest => {
            // Request bodies are encode-only; the header is the contract.
            ConfirmedRequestHeader::decode(r).map_err(|e| format!("{e}"))?;
        }
        ApduType::ComplexAck => {
            let header = ComplexAckHeader::decode(r).map_err(|e| format!("{e}"))?;
            if header.service_choice == SERVICE_READ_PROPERTY {
                ReadPropertyAck::decode_after_header(r).map_err(|e| format!("{e}"))?;
            }
        }
        ApduType::SimpleAck => {
            SimpleAck::decode(r).map_err(|e| format!("{e}"))?;
        }
        other => return Err(format!("corpus holds no {other:?} frames")),
    }
    Ok(())
}
