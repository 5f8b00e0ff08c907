//! Integration tests for the analysis pipeline

use buildcheck::{
    AnalysisDispatcher, CheckConfiguration, DispatchOutcome, EvaluatedPropertiesData,
    EvaluatedProperty, Severity, SharedOutputPathAnalyzer,
};
use std::sync::Arc;

fn project_event(project: &str, bin: &str, obj: &str) -> EvaluatedPropertiesData {
    EvaluatedPropertiesData::new(project)
        .with_property("OutputPath", EvaluatedProperty::new(bin, project, 3, 5))
        .with_property(
            "IntermediateOutputPath",
            EvaluatedProperty::new(obj, project, 4, 5),
        )
}

fn dispatcher_with_shared_output_path(overrides: &CheckConfiguration) -> AnalysisDispatcher {
    let mut dispatcher = AnalysisDispatcher::new();
    dispatcher
        .register_analyzer(Arc::new(SharedOutputPathAnalyzer::new()), overrides)
        .unwrap();
    dispatcher
}

#[test]
fn test_conflicting_projects_reported_once_each() {
    let dispatcher = dispatcher_with_shared_output_path(&CheckConfiguration::default());

    let mut outcome = DispatchOutcome::default();
    outcome.merge(dispatcher.dispatch_evaluated_properties(&project_event(
        "/src/app/app.proj",
        "bin",
        "obj",
    )));
    outcome.merge(dispatcher.dispatch_evaluated_properties(&project_event(
        "/src/app/tests.proj",
        "bin",
        "obj2",
    )));

    assert!(outcome.faults.is_empty());
    assert_eq!(outcome.results.len(), 1);
    let result = &outcome.results[0];
    assert_eq!(result.rule_id, "shared-output-path");
    assert_eq!(result.severity, Severity::Warning);
    assert_eq!(
        result.message,
        "Projects tests.proj and app.proj have conflicting output paths: /src/app/bin."
    );
    assert_eq!(result.location.line, 3);
}

#[test]
fn test_disjoint_projects_produce_nothing() {
    let dispatcher = dispatcher_with_shared_output_path(&CheckConfiguration::default());

    let mut outcome = DispatchOutcome::default();
    outcome.merge(dispatcher.dispatch_evaluated_properties(&project_event(
        "/src/a/a.proj",
        "bin",
        "obj",
    )));
    outcome.merge(dispatcher.dispatch_evaluated_properties(&project_event(
        "/src/b/b.proj",
        "bin",
        "obj",
    )));

    assert!(outcome.is_clean());
}

#[test]
fn test_severity_override_flows_to_results() {
    let overrides =
        CheckConfiguration::from_json(r#"{"rules":{"shared-output-path":{"severity":"error"}}}"#)
            .unwrap();
    let dispatcher = dispatcher_with_shared_output_path(&overrides);

    dispatcher.dispatch_evaluated_properties(&project_event("/src/p/one.proj", "bin", "obj"));
    let outcome =
        dispatcher.dispatch_evaluated_properties(&project_event("/src/p/two.proj", "bin", "obj2"));

    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].severity, Severity::Error);
    assert!(outcome.results[0].is_error());
}

#[test]
fn test_disabled_rule_silences_analyzer() {
    let overrides =
        CheckConfiguration::from_json(r#"{"rules":{"shared-output-path":{"enabled":false}}}"#)
            .unwrap();
    let dispatcher = dispatcher_with_shared_output_path(&overrides);

    dispatcher.dispatch_evaluated_properties(&project_event("/src/p/one.proj", "bin", "obj"));
    let outcome =
        dispatcher.dispatch_evaluated_properties(&project_event("/src/p/two.proj", "bin", "obj2"));

    assert!(outcome.is_clean());
}

#[test]
fn test_concurrent_dispatch_reports_each_loser_once() {
    use rayon::prelude::*;

    let dispatcher = dispatcher_with_shared_output_path(&CheckConfiguration::default());

    let outcomes: Vec<DispatchOutcome> = (0..32usize)
        .into_par_iter()
        .map(|i| {
            let event = project_event(&format!("/src/p/p{}.proj", i), "bin", &format!("obj{}", i));
            dispatcher.dispatch_evaluated_properties(&event)
        })
        .collect();

    let total: usize = outcomes.iter().map(|o| o.results.len()).sum();
    assert_eq!(total, 31);
    assert!(outcomes.iter().all(|o| o.faults.is_empty()));

    // Every conflict names the same winning project.
    let owners: Vec<&str> = outcomes
        .iter()
        .flat_map(|o| o.results.iter())
        .map(|r| r.message_args[1].as_str())
        .collect();
    assert!(owners.windows(2).all(|w| w[0] == w[1]));
}
