use super::*;

fn entity(name: &str, url: &str) -> Entity {
    Entity {
        name: name.to_string(),
        url: url.to_string(),
    }
}

fn brand(name: &str, competitors: Vec<Entity>) -> BrandEntry {
    BrandEntry {
        name: name.to_string(),
        url: format!("https://{}.example", name.to_lowercase()),
        competitors,
    }
}

#[test]
fn validate_rejects_empty_name() {
    let brands_file = BrandsFile {
        brands: vec![brand("  ", vec![])],
    };
    let err = validate_brands(&brands_file).unwrap_err();
    assert!(err.to_string().contains("non-empty"));
}

#[test]
fn validate_rejects_duplicate_name() {
    let brands_file = BrandsFile {
        brands: vec![brand("Acme", vec![]), brand("acme", vec![])],
    };
    let err = validate_brands(&brands_file).unwrap_err();
    assert!(err.to_string().contains("duplicate brand name"));
}

#[test]
fn validate_rejects_self_competitor() {
    let brands_file = BrandsFile {
        brands: vec![brand("Acme", vec![entity("ACME", "https://acme.com")])],
    };
    let err = validate_brands(&brands_file).unwrap_err();
    assert!(err.to_string().contains("itself"));
}

#[test]
fn validate_rejects_blank_competitor() {
    let brands_file = BrandsFile {
        brands: vec![brand("Acme", vec![entity("", "https://x.com")])],
    };
    let err = validate_brands(&brands_file).unwrap_err();
    assert!(err.to_string().contains("empty name"));
}

#[test]
fn validate_accepts_valid_roster() {
    let brands_file = BrandsFile {
        brands: vec![
            brand("Acme", vec![entity("Globex", "https://globex.com")]),
            brand("Initech", vec![]),
        ],
    };
    assert!(validate_brands(&brands_file).is_ok());
}

#[test]
fn find_is_case_insensitive() {
    let brands_file = BrandsFile {
        brands: vec![brand("Acme", vec![])],
    };
    assert!(brands_file.find("ACME").is_some());
    assert!(brands_file.find(" acme ").is_some());
    assert!(brands_file.find("Globex").is_none());
}

#[test]
fn competitors_default_to_empty() {
    let yaml = "brands:\n  - name: Acme\n    url: https://acme.com\n";
    let parsed: BrandsFile = serde_yaml::from_str(yaml).unwrap();
    assert!(parsed.brands[0].competitors.is_empty());
}

#[test]
fn load_brands_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("brands.yaml");
    assert!(
        path.exists(),
        "brands.yaml missing at {path:?}; required for this test"
    );
    let result = load_brands(&path);
    assert!(result.is_ok(), "failed to load brands.yaml: {result:?}");
    let brands_file = result.unwrap();
    assert!(!brands_file.brands.is_empty());
}

#[test]
fn load_brands_reports_missing_file() {
    let err = load_brands(Path::new("/definitely/not/here.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::BrandsFileIo { .. }));
}
