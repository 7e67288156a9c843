//! Gate behavior across every step and platform.

use plangate::workflow::{
    can_run, Applicability, Decision, DocumentSet, Gate, GateInput, Platform, StepCatalog, StepId,
    WorkflowError,
};

/// Every concrete prerequisite and output in the built-in catalog, plus one section spec.
fn everything() -> DocumentSet {
    let mut docs = DocumentSet::new();
    for def in StepCatalog::builtin().iter() {
        for path in def.prerequisites.iter().chain(&def.outputs) {
            if !path.contains('[') && !path.ends_with('/') {
                docs.insert(path);
            }
        }
    }
    docs.insert("product/sections/auth/spec.md");
    docs
}

#[test]
fn test_no_prerequisites_always_allowed_on_applicable_platforms() {
    let empty = DocumentSet::new();
    let full = everything();
    for def in StepCatalog::builtin().iter().filter(|d| d.prerequisites.is_empty()) {
        for platform in Platform::ALL.into_iter().filter(|p| def.applies_to.includes(*p)) {
            for docs in [&empty, &full] {
                let decision = can_run(def.id.as_str(), docs, Some(platform)).unwrap();
                assert_eq!(decision, Decision::Allowed, "{} on {platform}", def.id);
            }
        }
    }
}

#[test]
fn test_blocked_reports_full_difference_in_order() {
    let empty = DocumentSet::new();
    for def in StepCatalog::builtin().iter().filter(|d| !d.prerequisites.is_empty()) {
        let decision = can_run(def.id.as_str(), &empty, Some(Platform::Web)).unwrap();
        assert_eq!(decision, Decision::Blocked { missing: def.prerequisites.clone() }, "{}", def.id);
    }
}

#[test]
fn test_blocked_omits_present_documents() {
    let docs = DocumentSet::from_paths(["product/design-system/typography.json"]);
    let decision = can_run("design-shell", &docs, Some(Platform::MacosNative)).unwrap();
    assert_eq!(
        decision,
        Decision::Blocked { missing: vec!["product/design-system/colors.json".to_string()] }
    );
}

#[test]
fn test_everything_present_allows_every_applicable_step() {
    let docs = everything();
    for platform in Platform::ALL {
        for def in StepCatalog::builtin().iter() {
            let decision = can_run(def.id.as_str(), &docs, Some(platform)).unwrap();
            if def.applies_to.includes(platform) {
                assert_eq!(decision, Decision::Allowed, "{} on {platform}", def.id);
            } else {
                assert!(decision.is_skipped(), "{} on {platform}", def.id);
            }
        }
    }
}

#[test]
fn test_excluded_platforms_skip_regardless_of_documents() {
    let empty = DocumentSet::new();
    let full = everything();
    for def in StepCatalog::builtin().iter().filter(|d| d.applies_to != Applicability::All) {
        for platform in Platform::ALL.into_iter().filter(|p| !def.applies_to.includes(*p)) {
            for docs in [&empty, &full] {
                let decision = can_run(def.id.as_str(), docs, Some(platform)).unwrap();
                assert_eq!(
                    decision,
                    Decision::Skipped {
                        reason: format!("{} does not apply to platform {platform}", def.id)
                    }
                );
            }
        }
    }
}

#[test]
fn test_identical_inputs_identical_results() {
    let docs = DocumentSet::from_paths(["product/product-overview.md"]);
    let sections = vec!["auth".to_string()];
    let gate = Gate::default();
    let input = GateInput::new(&docs).with_sections(&sections);
    for step in StepId::ALL {
        for platform in Platform::ALL.map(Some).into_iter().chain([None]) {
            let first = gate.can_run(step.as_str(), &input, platform).unwrap();
            let second = gate.can_run(step.as_str(), &input, platform).unwrap();
            assert_eq!(first, second);
        }
    }
}

#[test]
fn test_documented_examples() {
    let roadmap_only = DocumentSet::new();
    assert_eq!(
        can_run("data-model", &roadmap_only, Some(Platform::Web)).unwrap(),
        Decision::Blocked { missing: vec!["product/product-roadmap.md".to_string()] }
    );

    let docs =
        DocumentSet::from_paths(["product/product-overview.md", "product/product-roadmap.md"]);
    assert_eq!(can_run("data-model", &docs, Some(Platform::Web)).unwrap(), Decision::Allowed);

    let docs = DocumentSet::from_paths(["product/product-overview.md"]);
    assert_eq!(
        can_run("design-tokens", &docs, Some(Platform::Cli)).unwrap(),
        Decision::Skipped { reason: "design-tokens does not apply to platform CLI".to_string() }
    );

    assert!(matches!(
        can_run("not-a-real-step", &DocumentSet::new(), Some(Platform::Web)),
        Err(WorkflowError::UnknownStep { .. })
    ));
}

#[test]
fn test_gate_is_shareable_across_threads() {
    let docs = DocumentSet::from_paths(["product/product-overview.md"]);
    let gate = Gate::default();
    std::thread::scope(|scope| {
        for platform in Platform::ALL {
            let docs = &docs;
            scope.spawn(move || {
                let decision =
                    gate.can_run("product-roadmap", &GateInput::new(docs), Some(platform)).unwrap();
                assert!(decision.is_allowed());
            });
        }
    });
}
