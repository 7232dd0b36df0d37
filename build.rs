use std::collections::HashSet;
use std::path::Path;

fn main() {
    let catalog_path = Path::new("catalogs/ha_references.json");
    validate_catalog_file(catalog_path);
    set_build_dependencies();
}

fn validate_catalog_file(catalog_path: &Path) {
    // Ensure catalog exists at build time
    assert!(
        catalog_path.exists(),
        "\n\nCATALOG BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the catalog file before building.\n",
        catalog_path.display()
    );

    // Read catalog file
    let catalog_contents = std::fs::read_to_string(catalog_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            catalog_path.display()
        );
    });

    // Parse and validate JSON
    let catalog: serde_json::Value = serde_json::from_str(&catalog_contents).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            catalog_path.display()
        );
    });

    let references = catalog.get("references").unwrap_or_else(|| {
        panic!("\n\nCATALOG BUILD ERROR: Missing 'references' field\n");
    });
    let refs = references.as_array().unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: 'references' must be an array\n\
             Got: {references}\n"
        )
    });

    // Validate each reference
    let total_residues = validate_references(refs);

    println!(
        "cargo:warning=Validated catalog: {} references, {total_residues} total residues",
        refs.len()
    );
}

fn validate_references(refs: &[serde_json::Value]) -> usize {
    let mut total_residues = 0;
    let mut seen_ids = HashSet::new();

    for (i, reference) in refs.iter().enumerate() {
        let ref_id = reference
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or("<unknown>");

        validate_reference_fields(reference, ref_id, i);
        assert!(
            seen_ids.insert(ref_id.to_string()),
            "\n\nCATALOG BUILD ERROR: Duplicate reference id '{ref_id}' (index {i})\n"
        );
        total_residues += validate_reference_chains(reference, ref_id);
    }

    total_residues
}

fn validate_reference_fields(reference: &serde_json::Value, ref_id: &str, index: usize) {
    assert!(
        reference.get("id").is_some(),
        "\n\nCATALOG BUILD ERROR: Reference at index {index} missing 'id' field\n"
    );
    assert!(
        reference.get("display_name").is_some(),
        "\n\nCATALOG BUILD ERROR: Reference '{ref_id}' (index {index}) missing 'display_name' field\n"
    );
    assert!(
        reference.get("chains").is_some(),
        "\n\nCATALOG BUILD ERROR: Reference '{ref_id}' (index {index}) missing 'chains' field\n"
    );
}

fn validate_reference_chains(reference: &serde_json::Value, ref_id: &str) -> usize {
    let chains = reference
        .get("chains")
        .and_then(|c| c.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();

    assert!(
        !chains.is_empty(),
        "\n\nCATALOG BUILD ERROR: Reference '{ref_id}' has no chains\n"
    );

    chains
        .iter()
        .enumerate()
        .map(|(j, chain)| validate_chain_fields(chain, ref_id, j))
        .sum()
}

fn validate_chain_fields(chain: &serde_json::Value, ref_id: &str, index: usize) -> usize {
    let chain_name = chain
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("<unknown>");

    assert!(
        chain.get("name").is_some(),
        "\n\nCATALOG BUILD ERROR: Reference '{ref_id}' chain {index} missing 'name' field\n"
    );

    let sequence = chain
        .get("sequence")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_else(|| {
            panic!(
                "\n\nCATALOG BUILD ERROR: Reference '{ref_id}' chain '{chain_name}' (index {index}) missing 'sequence' field\n"
            )
        });

    // Validate sequence holds residues only
    assert!(
        !sequence.is_empty() && sequence.chars().all(|c| c.is_ascii_alphabetic()),
        "\n\nCATALOG BUILD ERROR: Reference '{ref_id}' chain '{chain_name}' has an empty sequence \
         or characters other than one-letter residue codes\n"
    );

    sequence.len()
}

fn set_build_dependencies() {
    // Tell cargo to rerun if catalog changes
    println!("cargo:rerun-if-changed=catalogs/ha_references.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
