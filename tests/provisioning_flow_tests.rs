//! # Provisioning Flow Tests
//!
//! End-to-end checks of the pure provisioning pipeline: a validated form
//! submission becomes an Application descriptor whose parameter map reads
//! back exactly, list entries are filtered by ownership, and detail links
//! respect feature gating. Cluster API calls themselves are external
//! collaborators and are not exercised here.

use std::collections::{BTreeMap, HashMap, HashSet};

use sandbox_dashboard::config::{DashboardConfig, DomainConfig, LinkTemplate};
use sandbox_dashboard::identity::User;
use sandbox_dashboard::naming;
use sandbox_dashboard::sandbox::application::parameter_map;
use sandbox_dashboard::sandbox::create::{build_application, sandbox_labels, with_identity};
use sandbox_dashboard::sandbox::detail::render_links;
use sandbox_dashboard::sandbox::list::{owned_by, summarize};
use sandbox_dashboard::web::forms;

const CONFIG: &str = r"
cluster:
  name: playground
  server: https://kube.example.com:6443
  oidc-issuer-url: https://auth.example.com
registry:
  hostname: registry.example.com
argo:
  url: git@git.example.com:lab-template
features:
  - name: prometheus
    description: Instantiate Prometheus for this namespace
    default: false
  - name: subdomain
    description: Create dedicated subdomain
    default: false
sandboxLinks:
  - name: Grafana
    url: https://grafana{hostname_suffix}
    feature: prometheus
  - name: Registry
    url: https://{registry}
";

fn config() -> DashboardConfig {
    DashboardConfig::parse(CONFIG).unwrap()
}

fn alice() -> User {
    User {
        name: "alice".into(),
        email: "alice@example.com".into(),
    }
}

fn submit(user: &User, fields: &[(&str, &str)]) -> sandbox_dashboard::sandbox::application::Application {
    let config = config();
    let submitted: HashMap<String, String> = fields
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect();
    let parameters = forms::validate(&config, &submitted).unwrap();
    let name = naming::sandbox_name(&user.name);
    build_application(
        config.argo.as_ref().unwrap(),
        &name,
        sandbox_labels(&user.name),
        with_identity(parameters, user),
    )
}

#[test]
fn created_sandbox_reads_back_submitted_and_synthesized_parameters() {
    let descriptor = submit(&alice(), &[("prometheus", "on")]);
    let map = parameter_map(&descriptor);

    let expected: BTreeMap<String, String> = [
        ("prometheus", "true"),
        ("subdomain", "false"),
        ("username", "alice"),
        ("email", "alice@example.com"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect();
    assert_eq!(map, expected);
}

#[test]
fn list_entry_matches_creation() {
    let descriptor = submit(&alice(), &[("subdomain", "on")]);
    let summary = summarize(&descriptor, &DomainConfig::default()).unwrap();

    assert_eq!(summary.name, descriptor.metadata.name.clone().unwrap());
    assert_eq!(summary.namespace, summary.name);
    assert_eq!(summary.hostname_suffix, ".alice.codemowers.cloud");
    assert!(owned_by(&summary, &alice()));
}

#[test]
fn owner_filtering_hides_foreign_sandboxes() {
    let bob = User {
        name: "bob".into(),
        email: "bob@example.com".into(),
    };
    let theirs = summarize(&submit(&bob, &[]), &DomainConfig::default()).unwrap();
    assert!(!owned_by(&theirs, &alice()));
}

#[test]
fn hostname_suffix_depends_on_subdomain_flag() {
    let with = summarize(&submit(&alice(), &[("subdomain", "true")]), &DomainConfig::default())
        .unwrap();
    let without = summarize(&submit(&alice(), &[]), &DomainConfig::default()).unwrap();
    assert_eq!(with.hostname_suffix, ".alice.codemowers.cloud");
    assert_eq!(without.hostname_suffix, "-alice.codemowers.ee");
}

#[test]
fn gated_links_follow_the_feature_flag() {
    let config = config();
    let gated = |flag: &str| {
        let descriptor = submit(&alice(), &[("prometheus", flag)]);
        let parameters = parameter_map(&descriptor);
        let mut variables = parameters.clone();
        variables.insert("hostname_suffix".into(), "-alice.codemowers.ee".into());
        variables.insert("registry".into(), config.registry.hostname.clone());
        render_links(&config.sandbox_links, &parameters, &variables)
    };

    let enabled = gated("true");
    assert!(enabled.iter().any(|link| link.name == "Grafana"));

    let disabled = gated("false");
    assert!(!disabled.iter().any(|link| link.name == "Grafana"));
    // Ungated links render either way.
    assert!(disabled.iter().any(|link| link.name == "Registry"));
}

#[test]
fn links_gated_by_absent_parameters_are_omitted() {
    let templates = vec![LinkTemplate {
        name: "Grafana".into(),
        url: "https://grafana{hostname_suffix}".into(),
        feature: Some("prometheus".into()),
    }];
    // A sandbox created before the flag existed has no parameter at all;
    // the gate treats absence as false.
    let links = render_links(&templates, &BTreeMap::new(), &BTreeMap::new());
    assert!(links.is_empty());
}

#[test]
fn generated_names_are_probabilistically_unique() {
    // 32^5 suffix combinations and no collision check at creation time:
    // uniqueness within a process run is overwhelmingly likely but not
    // guaranteed. This samples a handful of names to document the shape,
    // not to assert collision-freedom.
    let names: HashSet<String> = (0..20).map(|_| naming::sandbox_name("alice")).collect();
    assert_eq!(names.len(), 20);
    for name in &names {
        assert!(name.starts_with("sb-alice-"));
    }
}
