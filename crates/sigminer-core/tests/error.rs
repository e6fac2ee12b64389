//! Tests for error handling

use std::io;
use std::path::PathBuf;

use sigminer_core::error::{Result, SigminerError};
use sigminer_core::types::{Address, ReturnCode, Signature, SignatureResult, TypeEntry};

#[test]
fn test_every_variant_maps_to_its_code()
{
    let cases = [
        (SigminerError::InvalidInput("empty".into()), ReturnCode::InvalidInput),
        (
            SigminerError::FileOpen {
                path: PathBuf::from("/nope"),
                source: io::Error::new(io::ErrorKind::NotFound, "missing"),
            },
            ReturnCode::FileOpenFailure,
        ),
        (
            SigminerError::ObjectParse {
                path: PathBuf::from("/nope"),
                reason: "bad magic".into(),
            },
            ReturnCode::FileOpenFailure,
        ),
        (
            SigminerError::DwarfUnavailable {
                path: PathBuf::from("/nope"),
                reason: "no .debug_info section".into(),
            },
            ReturnCode::DwarfUnavailable,
        ),
        (
            SigminerError::Dwarf {
                context: "parsing compilation unit".into(),
                source: gimli::Error::UnexpectedEof(gimli::ReaderOffsetId(0)),
            },
            ReturnCode::DwarfUnavailable,
        ),
        (SigminerError::SymbolNotFound("f".into()), ReturnCode::SymbolResolutionFailure),
        (
            SigminerError::FunctionNotInRange {
                symbol: "f".into(),
                address: Address::new(0x1000),
            },
            ReturnCode::FunctionDieNotInRange,
        ),
        (
            SigminerError::UnsupportedType {
                slot: "return".into(),
            },
            ReturnCode::UnsupportedType,
        ),
        (SigminerError::Internal("oops".into()), ReturnCode::InternalFailure),
    ];

    for (error, code) in cases {
        assert_eq!(error.return_code(), code, "{error}");
    }
}

#[test]
fn test_error_display()
{
    let error = SigminerError::FunctionNotInRange {
        symbol: "add".into(),
        address: Address::new(0x10),
    };
    let message = format!("{}", error);
    assert!(message.contains("add"));
    assert!(message.contains("0x0000000000000010"));

    let error = SigminerError::SymbolNotFound("missing_fn".into());
    assert!(format!("{}", error).contains("missing_fn"));
}

#[test]
fn test_file_open_keeps_source()
{
    use std::error::Error;

    let error = SigminerError::FileOpen {
        path: PathBuf::from("/tmp/lib.so"),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    };
    assert!(error.source().is_some());
    assert!(format!("{}", error).contains("/tmp/lib.so"));
}

#[test]
fn test_result_converts_at_boundary()
{
    let ok: Result<Signature> = Ok(Signature::new(TypeEntry::void(), Vec::new(), false));
    let converted = SignatureResult::from(ok);
    assert!(converted.is_success());

    let failed: Result<Signature> = Err(SigminerError::SymbolNotFound("f".into()));
    let converted = SignatureResult::from(failed);
    assert_eq!(converted.ret_code(), ReturnCode::SymbolResolutionFailure);
    assert!(converted.signature().is_none());
}
