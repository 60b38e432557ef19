use super::*;

fn valid() -> GenerationSettings {
    GenerationSettings::default().with_prompt("a red balloon")
}

#[test]
fn defaults_match_fill_api() {
    let s = GenerationSettings::default();
    assert_eq!(s.steps, 50);
    assert_eq!(s.guidance, 50.75);
    assert_eq!(s.safety_tolerance, 2);
    assert_eq!(s.output_format, OutputFormat::Jpeg);
    assert!(!s.use_finetune);
    assert_eq!(s.finetune_id, "my-finetune");
    assert_eq!(s.finetune_strength, 1.1);
}

#[test]
fn finetune_toggle_resets_guidance() {
    let mut s = valid();
    s.guidance = 12.0;
    s.set_use_finetune(true);
    assert_eq!(s.guidance, 60.0);
    s.guidance = 30.0;
    s.set_use_finetune(false);
    assert_eq!(s.guidance, 50.75);
}

#[test]
fn prompt_bounds() {
    assert!(valid().validate().is_ok());
    let err = GenerationSettings::default()
        .with_prompt("   ")
        .validate()
        .unwrap_err();
    assert!(matches!(err, InpaintError::Validation(_)));
    assert!(
        GenerationSettings::default()
            .with_prompt("x".repeat(501))
            .validate()
            .is_err()
    );
    assert!(
        GenerationSettings::default()
            .with_prompt("x".repeat(500))
            .validate()
            .is_ok()
    );
}

#[test]
fn finetune_requires_id() {
    let mut s = valid();
    s.set_use_finetune(true);
    s.finetune_id = String::new();
    assert_eq!(
        s.validate().unwrap_err().user_message(),
        "Finetune ID is required when using finetune API"
    );
}

#[test]
fn numeric_ranges_are_enforced() {
    let mut s = valid();
    s.steps = 14;
    assert!(s.validate().is_err());

    let mut s = valid();
    s.guidance = 100.5;
    assert!(s.validate().is_err());

    let mut s = valid();
    s.safety_tolerance = 7;
    assert!(s.validate().is_err());
}

#[test]
fn partial_json_fills_defaults() {
    let s: GenerationSettings =
        serde_json::from_str(r#"{"prompt": "sky", "output_format": "png"}"#).unwrap();
    assert_eq!(s.prompt, "sky");
    assert_eq!(s.output_format, OutputFormat::Png);
    assert_eq!(s.steps, 50);
}

#[test]
fn output_format_parses_jpg_alias() {
    assert_eq!("JPG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
    assert_eq!(OutputFormat::Png.extension(), "png");
    assert!("gif".parse::<OutputFormat>().is_err());
}
