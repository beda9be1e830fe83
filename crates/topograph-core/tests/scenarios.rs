//! End-to-end scenarios over small hand-built architectures.

use rstest::{fixture, rstest};
use topograph_core::analysis::impact::sort_by_impact;
use topograph_core::{
    Application, Impact, ImpactAnalyzer, Project, Service, build_group_tree, detect_cycles,
    distinct_cycles, impact_analyze, validate,
};

// ============================================================================
// Fixtures
// ============================================================================

/// A small shop: storefront -> checkout -> {payment.api, stock} -> db.
#[fixture]
fn shop() -> Project {
    Project::new(
        "shop",
        vec![
            Application::new("storefront")
                .with_group("edge")
                .with_dependency("checkout.orders"),
            Application::new("checkout")
                .with_group("core/sales")
                .with_service(Service::new("orders").with_dependency("payment.api"))
                .with_dependency("stock"),
            Application::new("payment")
                .with_group("core/payments")
                .with_service(Service::new("api"))
                .with_dependency("db"),
            Application::new("stock")
                .with_group("core/sales")
                .with_dependency("db"),
            Application::new("db"),
        ],
    )
}

fn names<'a>(applications: &[&'a Application]) -> Vec<&'a str> {
    applications.iter().map(|a| a.name.as_str()).collect()
}

// ============================================================================
// Reference resolution
// ============================================================================

#[test]
fn test_simple_reference_scenario() {
    let project = Project::new(
        "Project1",
        vec![
            Application::new("app1").with_dependency("app2"),
            Application::new("app2"),
        ],
    );
    let app1 = project.find_application("app1").unwrap();
    let app2 = project.find_application("app2").unwrap();

    assert_eq!(names(&project.find_applications_that_reference(app2)), vec!["app1"]);
    assert!(project.find_applications_that_reference(app1).is_empty());
    assert!(validate(&project).is_empty());
}

#[rstest]
fn test_shop_is_valid_and_acyclic(shop: Project) {
    assert!(validate(&shop).is_empty());
    assert!(detect_cycles(&shop).is_empty());
    assert!(distinct_cycles(&shop).is_empty());
}

#[rstest]
fn test_service_dependency_resolves(shop: Project) {
    let storefront = shop.find_application("storefront").unwrap();
    let dependency = &storefront.dependencies[0];

    assert_eq!(dependency.application(&shop).unwrap().name, "checkout");
    assert_eq!(dependency.service(&shop).unwrap().unwrap().name, "orders");
}

// ============================================================================
// Cycles
// ============================================================================

#[test]
fn test_cycle_is_valid_but_cyclic() {
    let project = Project::new(
        "Project2",
        vec![
            Application::new("app1").with_dependency("app2"),
            Application::new("app2").with_dependency("app3"),
            Application::new("app3").with_dependency("app1"),
        ],
    );

    assert!(validate(&project).is_empty());
    let errors = detect_cycles(&project);
    assert!(!errors.is_empty());
    assert!(
        errors[0]
            .to_string()
            .contains("app1 -> app2 -> app3 -> app1")
    );
}

#[rstest]
fn test_dangling_reference_is_reported_once_and_not_walked(mut shop: Project) {
    shop.applications[4] = Application::new("db").with_dependency("ghost");
    shop.assign_ids();

    let errors = validate(&shop);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "Application 'db' Dependencies has Error: Application with name 'ghost' not found"
    );
    assert!(detect_cycles(&shop).is_empty());
}

// ============================================================================
// Impact
// ============================================================================

#[rstest]
#[case("db", 2, 4)]
#[case("payment", 1, 2)]
#[case("checkout", 1, 1)]
#[case("storefront", 0, 0)]
fn test_shop_impact(
    shop: Project,
    #[case] name: &str,
    #[case] direct: usize,
    #[case] indirect: usize,
) {
    let analyzer = ImpactAnalyzer::new(&shop);
    let application = shop.find_application(name).unwrap();
    assert_eq!(analyzer.impact_of(application), Impact { direct, indirect });
}

#[rstest]
fn test_ranked_impact_report(shop: Project) {
    let mut rows = impact_analyze(&shop);
    sort_by_impact(&mut rows);
    let order: Vec<&str> = rows.iter().map(|r| r.application.as_str()).collect();

    assert_eq!(order, vec!["db", "payment", "stock", "checkout", "storefront"]);
}

// ============================================================================
// Groups
// ============================================================================

#[test]
fn test_nested_group_scenario() {
    let project = Project::new(
        "p",
        vec![
            Application::new("payment").with_group("core/payments"),
            Application::new("portal"),
        ],
    );
    let root = build_group_tree(&project);

    assert_eq!(names(&root.applications), vec!["portal"]);
    let core = root.find("core").unwrap();
    assert_eq!(core.sub_groups.len(), 1);
    assert_eq!(names(&core.sub_groups[0].applications), vec!["payment"]);
}

#[rstest]
fn test_shop_groups(shop: Project) {
    let root = build_group_tree(&shop);

    let sales = root.find("core/sales").unwrap();
    assert_eq!(names(&sales.applications), vec!["checkout", "stock"]);
    assert_eq!(root.find("core").unwrap().application_count(), 3);
    assert_eq!(root.application_count(), shop.len());
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_application_reads_definition_yaml() {
    let yaml = r"
name: payment
group: core/payments
status: planned
provided-services:
  - name: api
    isOpenHost: true
    dependencies:
      - reference: ledger
dependencies:
infrastructure-dependencies:
  - type: database
display:
  bordercolor: '#ff0000'
";
    let application: Application = serde_yaml::from_str(yaml).unwrap();

    assert!(application.is_planned());
    assert!(application.is_open_host());
    assert!(application.dependencies.is_empty());
    assert_eq!(application.provided_services[0].dependencies[0].reference, "ledger");
    assert_eq!(application.infrastructure_dependencies[0].kind, "database");
    assert_eq!(application.display.border_color, "#ff0000");
    assert_eq!(application.main_group(), "core");
}
