use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        InpaintError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        InpaintError::network("x")
            .to_string()
            .contains("network error:")
    );
    assert!(
        InpaintError::generation_failed("x")
            .to_string()
            .contains("generation failed:")
    );
    assert!(
        InpaintError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        InpaintError::Timeout { attempts: 60 }
            .to_string()
            .contains("60 status checks")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = InpaintError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn user_message_passes_remote_failure_verbatim() {
    let err = InpaintError::generation_failed("NSFW content detected");
    assert_eq!(err.user_message(), "NSFW content detected");
}

#[test]
fn timeout_and_failure_messages_differ() {
    let timeout = InpaintError::Timeout { attempts: 60 }.user_message();
    let failed = InpaintError::generation_failed("Generation failed").user_message();
    assert_ne!(timeout, failed);
    assert!(timeout.contains("timed out"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: InpaintError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, InpaintError::Serde(_)));
}
