use engagement_scoping::core::allocation::AllocationReducer;
use engagement_scoping::core::effort::EffortEngine;
use engagement_scoping::core::scope::ScopeAggregator;
use engagement_scoping::{Catalog, ScopeAnswer, ScopingEngine, Submission};
use proptest::prelude::*;

const EPSILON: f64 = 1e-6;

/// Sample submission the category totals below were reconciled against.
const REFERENCE_YES: &[(&str, f64)] = &[
    ("Account", 2000.0),
    ("Account Alternate Hierarchies", 2.0),
    ("Rationalization of CoA", 0.0),
    ("Multi-Currency", 5.0),
    ("Reporting Currency", 2.0),
    ("Entity", 25.0),
    ("Entity Alternate Hierarchies", 2.0),
    ("Scenario", 2.0),
    ("Multi-GAAP", 0.0),
    ("Custom Dimensions", 2.0),
    ("Alternate Hierarchies in Custom Dimensions", 2.0),
    ("Additional Alias Tables", 1.0),
    ("Elimination", 0.0),
    ("Consolidation Journals", 0.0),
    ("Journal Templates", 1.0),
    ("Parent Currency Journals", 0.0),
    ("Cash Flow", 0.0),
    ("Approval Process", 0.0),
    ("Historic Overrides", 0.0),
    ("Audit", 0.0),
    ("Data Forms", 5.0),
    ("Business Rules", 3.0),
    ("Member Formula", 20.0),
    ("Ratios", 0.0),
    ("Secured Dimensions", 1.0),
    ("Number of Users", 20.0),
    ("Historical Data Validation", 2.0),
    ("Data Validation for Account Alt Hierarchies", 0.0),
    ("Data Validation for Entity Alt Hierarchies", 0.0),
    ("Historical Journal Conversion", 0.0),
    ("Direct Connect Integrations", 1.0),
    ("Custom Scripting", 2.0),
    ("Management Reports", 5.0),
    ("Consolidation Journal Reports", 1.0),
    ("Intercompany Reports", 1.0),
    ("Smart View Reports", 3.0),
    ("Automated Data loads", 0.0),
    ("Automated Consolidations", 0.0),
    ("Unit Testing", 0.0),
    ("UAT", 0.0),
    ("SIT", 0.0),
    ("Parallel Testing", 3.0),
    ("User Training", 0.0),
    ("Go Live", 0.0),
    ("Hypercare", 0.0),
    ("RTM", 0.0),
    ("Design Document", 0.0),
    ("System Configuration Document", 0.0),
    ("Admin Desktop Procedures", 0.0),
    ("End User Desktop Procedures", 0.0),
    ("Project Management", 0.0),
];

const REFERENCE_CATEGORY_HOURS: &[(&str, f64)] = &[
    ("Project Initiation and Planning", 18.0),
    ("Creating and Managing EPM Cloud Infrastructure", 6.0),
    ("Requirement Gathering, Read back and Client Sign-off", 44.0),
    ("Design", 42.0),
    ("Build and Configure FCC", 148.0),
    ("Setup Application Features", 96.5),
    ("Application Customization", 72.0),
    ("Calculations", 126.0),
    ("Security", 24.0),
    ("Historical Data", 552.0),
    ("Integrations", 140.0),
    ("Reporting", 140.0),
    ("Automations", 64.0),
    ("Testing/Training", 244.0),
    ("Transition", 96.0),
    ("Documentations", 36.0),
    ("Change Management", 44.0),
];

/// Every catalog item answered: the listed ones YES, the rest NO.
fn reference_answers(catalog: &Catalog) -> Vec<ScopeAnswer> {
    catalog
        .scope_items()
        .iter()
        .map(|item| {
            match REFERENCE_YES.iter().find(|(name, _)| *name == item.name) {
                Some((name, qty)) => ScopeAnswer::yes(*name, *qty),
                None => ScopeAnswer::no(item.name.clone()),
            }
        })
        .collect()
}

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}

#[test]
fn test_reference_submission_reproduces_category_totals() -> anyhow::Result<()> {
    let catalog = Catalog::shared()?;
    let submission = Submission {
        answers: reference_answers(catalog),
        selected_roles: vec![],
    };

    let estimate = ScopingEngine::new(catalog).run(&submission);

    assert_close(estimate.scope.total_weightage, 129.0, "total weightage");
    assert_eq!(estimate.scope.tier.id, 3);
    assert_eq!(estimate.scope.tier.name, "Tier 3 - Enhanced Scope");

    let names: Vec<&str> = estimate.effort.categories.iter().map(|c| c.name.as_str()).collect();
    let expected_names: Vec<&str> = REFERENCE_CATEGORY_HOURS.iter().map(|(n, _)| *n).collect();
    assert_eq!(names, expected_names);

    for (name, hours) in REFERENCE_CATEGORY_HOURS {
        assert_close(estimate.effort.category_hours(name), *hours, name);
    }
    assert_close(estimate.effort.summary.total_hours, 1892.5, "total hours");
    assert_close(estimate.effort.summary.total_days, 1892.5 / 8.0, "total days");
    Ok(())
}

#[test]
fn test_reference_submission_role_allocation() -> anyhow::Result<()> {
    let catalog = Catalog::shared()?;
    let submission = Submission {
        answers: reference_answers(catalog),
        selected_roles: catalog.roles().to_vec(),
    };
    let estimate = ScopingEngine::new(catalog).run(&submission);
    let allocation = &estimate.allocation;

    assert_eq!(allocation.roles.len(), catalog.roles().len());

    let expected = [
        ("PM USA", 946.25),
        ("PM India", 946.25),
        ("Architect USA", 460.5),
        ("Sr. Delivery Lead India", 946.25),
        ("App Lead USA", 1874.5),
        ("App Developer India", 1782.5),
        ("Integration Lead USA", 436.0),
        ("Reporting Lead India", 188.8),
        ("Security Lead India", 24.0),
    ];
    for (role, hours) in expected {
        let allocated = allocation
            .role(role)
            .ok_or_else(|| anyhow::anyhow!("missing role {}", role))?;
        assert_close(allocated.hours, hours, role);
        assert_close(allocated.days, hours / 8.0, role);
        assert_close(allocated.months, hours / 8.0 / 30.0, role);
    }
    Ok(())
}

#[test]
fn test_everything_out_of_scope_gives_baseline_effort() -> anyhow::Result<()> {
    let catalog = Catalog::shared()?;
    let answers: Vec<ScopeAnswer> = catalog
        .scope_items()
        .iter()
        .map(|item| ScopeAnswer::no(item.name.clone()))
        .collect();

    let scope = ScopeAggregator::new(catalog).process(&answers, &[]);
    assert_eq!(scope.total_weightage, 0.0);
    assert_eq!(scope.tier.id, 1);
    assert_eq!(scope.summary.in_scope_count, 0);

    let effort = EffortEngine::new(catalog).calculate(&scope);
    assert_close(effort.summary.total_hours, 790.5, "total hours");
    assert_close(effort.summary.total_hours, catalog.total_baseline_hours(), "baseline");
    for category in &effort.categories {
        assert_eq!(category.tier_adjustment, 0.0);
        assert_eq!(category.final_hours, category.baseline_hours, "{}", category.name);
    }

    let nobody = AllocationReducer::new(catalog.allocation()).reduce(&effort, &[]);
    assert!(nobody.roles.is_empty());
    assert_eq!(nobody.total_hours, 0.0);
    Ok(())
}

#[test]
fn test_history_validation_hours_ignore_its_own_answer() -> anyhow::Result<()> {
    let catalog = Catalog::shared()?;
    let answers = vec![ScopeAnswer::new("Historical Data Validation", "NO", 2.0)];

    let scope = ScopeAggregator::new(catalog).process(&answers, &[]);
    assert_eq!(scope.total_weightage, 0.0);

    let effort = EffortEngine::new(catalog).calculate(&scope);
    // (15 + 3 x 10) x 8 = 360 on top of the 60 hour baseline
    assert_close(effort.category_hours("Historical Data"), 420.0, "Historical Data");
    Ok(())
}

#[test]
fn test_parent_quantity_children_need_their_own_yes() -> anyhow::Result<()> {
    let catalog = Catalog::shared()?;
    let answers = vec![
        ScopeAnswer::new("Historical Data Validation", "NO", 3.0),
        ScopeAnswer::yes("Historical Journal Conversion", 0.0),
        ScopeAnswer::no("Data Validation for Account Alt Hierarchies"),
    ];

    let scope = ScopeAggregator::new(catalog).process(&answers, &[]);
    assert_eq!(scope.total_weightage, 0.0);

    let effort = EffortEngine::new(catalog).calculate(&scope);
    let history = effort
        .category("Historical Data")
        .ok_or_else(|| anyhow::anyhow!("missing category"))?;
    let task = |name: &str| {
        history
            .tasks
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.final_hours)
            .unwrap_or(f64::NAN)
    };

    assert_close(task("Historical Data Validation"), 440.0, "validation");
    assert_close(task("Historical Journal Conversion"), 60.0, "journal conversion");
    assert_close(task("Data Validation for Account Alt Hierarchies"), 0.0, "account alt");
    assert_close(history.final_hours, 60.0 + 440.0 + 60.0, "category");
    Ok(())
}

#[test]
fn test_entity_alt_validation_follows_sibling_quantity() -> anyhow::Result<()> {
    let catalog = Catalog::shared()?;
    let answers = vec![ScopeAnswer::new("Entity Alternate Hierarchies", "NO", 3.0)];

    let scope = ScopeAggregator::new(catalog).process(&answers, &[]);
    let effort = EffortEngine::new(catalog).calculate(&scope);

    assert_close(effort.category_hours("Historical Data"), 60.0 + 60.0, "Historical Data");
    Ok(())
}

#[test]
fn test_banded_quantity_splits_into_three_buckets() -> anyhow::Result<()> {
    let catalog = Catalog::shared()?;
    let answers = vec![ScopeAnswer::yes("Data Forms", 5.0)];

    let scope = ScopeAggregator::new(catalog).process(&answers, &[]);
    let effort = EffortEngine::new(catalog).calculate(&scope);
    let customization = effort
        .category("Application Customization")
        .ok_or_else(|| anyhow::anyhow!("missing category"))?;
    let forms = customization
        .tasks
        .iter()
        .find(|t| t.name == "Data Forms")
        .ok_or_else(|| anyhow::anyhow!("missing task"))?;

    // buckets 3 / 1 / 1 at 8 / 12 / 16 hours
    assert_eq!(forms.final_hours, 3.0 * 8.0 + 12.0 + 16.0);
    assert_eq!(forms.rule, "banded_scaling");
    assert_eq!(forms.quantity, 5.0);
    Ok(())
}

#[test]
fn test_quantity_five_against_each_banded_rate_triple() -> anyhow::Result<()> {
    let catalog = Catalog::shared()?;
    // (category, task, hours for buckets 3 / 1 / 1)
    let cases = [
        ("Application Customization", "Dashboards", 3.0 * 8.0 + 12.0 + 16.0),
        ("Calculations", "Business Rules", 3.0 * 8.0 + 12.0 + 16.0),
        ("Calculations", "Member Formula", 13.0),
        ("Calculations", "Custom KPIs", 14.0),
        ("Reporting", "Management Reports", 3.0 * 8.0 + 12.0 + 16.0),
    ];

    for (category, task, expected) in cases {
        let scope = ScopeAggregator::new(catalog).process(&[ScopeAnswer::yes(task, 5.0)], &[]);
        let effort = EffortEngine::new(catalog).calculate(&scope);
        let hours = effort
            .category(category)
            .and_then(|c| c.tasks.iter().find(|t| t.name == task))
            .map(|t| t.final_hours)
            .ok_or_else(|| anyhow::anyhow!("missing task {}", task))?;
        assert_eq!(hours, expected, "{}", task);
    }
    Ok(())
}

#[test]
fn test_selected_roles_flow_through_submission() -> anyhow::Result<()> {
    let catalog = Catalog::shared()?;
    let submission = Submission {
        answers: vec![ScopeAnswer::yes("Data Forms", 5.0)],
        selected_roles: vec![
            "Security Lead India".to_string(),
            "Not A Role".to_string(),
            "PM USA".to_string(),
        ],
    };
    let estimate = ScopingEngine::new(catalog).run(&submission);
    let roles: Vec<&str> = estimate.allocation.roles.iter().map(|r| r.role.as_str()).collect();
    assert_eq!(roles, vec!["Security Lead India", "PM USA"]);

    let direct = AllocationReducer::new(catalog.allocation())
        .reduce(&estimate.effort, &estimate.scope.selected_roles);
    assert_eq!(direct, estimate.allocation);

    let expected_security: f64 = catalog
        .allocation()
        .rows
        .iter()
        .map(|row| estimate.effort.category_hours(&row.category) * row.fraction("Security Lead India"))
        .sum();
    assert_close(estimate.allocation.roles[0].hours, expected_security, "security");
    Ok(())
}

#[test]
fn test_estimate_serializes_to_json() -> anyhow::Result<()> {
    let catalog = Catalog::shared()?;
    let submission = Submission {
        answers: vec![ScopeAnswer::yes("Cash Flow", 0.0)],
        selected_roles: vec!["PM USA".to_string()],
    };
    let estimate = ScopingEngine::new(catalog).run(&submission);
    let json = serde_json::to_value(&estimate)?;

    assert!(json["scope"]["tier"]["name"].is_string());
    assert_eq!(json["effort"]["categories"].as_array().map(Vec::len), Some(17));
    assert_eq!(json["allocation"]["roles"][0]["role"], "PM USA");
    assert!(json["key_design_decisions"]
        .as_array()
        .map(|k| k.iter().any(|d| d["id"] == "KDD06"))
        .unwrap_or(false));
    Ok(())
}

proptest! {
    #[test]
    fn prop_every_weightage_maps_to_one_tier(a in 0.0f64..2000.0, b in 0.0f64..2000.0) {
        let catalog = Catalog::shared().unwrap();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };

        let low_tier = catalog.classify(low);
        let high_tier = catalog.classify(high);
        prop_assert!(low_tier.id <= high_tier.id);

        let matching = catalog
            .tiers()
            .bands()
            .iter()
            .filter(|band| band.id == low_tier.id)
            .count();
        prop_assert_eq!(matching, 1);
        prop_assert!(low <= low_tier.max_weightage || low_tier.id == 5);
    }

    #[test]
    fn prop_weightage_is_idempotent(
        accounts in 0u32..5000,
        entities in 0u32..200,
        forms in 0u32..40,
        users in 0u32..500,
    ) {
        let catalog = Catalog::shared().unwrap();
        let answers = vec![
            ScopeAnswer::yes("Account", accounts as f64),
            ScopeAnswer::yes("Entity", entities as f64),
            ScopeAnswer::yes("Data Forms", forms as f64),
            ScopeAnswer::yes("Number of Users", users as f64),
        ];
        let mut reversed = answers.clone();
        reversed.reverse();

        let aggregator = ScopeAggregator::new(catalog);
        let first = aggregator.process(&answers, &[]);
        let second = aggregator.process(&answers, &[]);
        let reordered = aggregator.process(&reversed, &[]);

        prop_assert_eq!(first.total_weightage, second.total_weightage);
        prop_assert_eq!(&first.items, &second.items);
        prop_assert_eq!(first.total_weightage, reordered.total_weightage);
        prop_assert!(first.total_weightage >= 0.0);
    }
}
