use super::driver::rank_calls;
use super::reporter::{Reporter, applicability_label};
use crate::scenario::Scenario;
use tyinfer_solver::{Applicability, CallSiteLookup};

fn scenario(json: &str) -> Scenario {
    Scenario::from_json(json).expect("scenario loads")
}

#[test]
fn formats_signatures() {
    let scenario = scenario(
        r#"{
            "classes": [{ "name": "Util" }, { "name": "List", "typeParams": ["E"] }],
            "methods": [
                { "name": "wrap", "owner": "Util", "typeParams": ["T", "U"],
                  "params": ["T", "Object[]"], "varargs": true, "returns": "List<T>" },
                { "name": "run", "params": ["int[]"] }
            ],
            "calls": [{ "id": "c", "candidates": ["wrap", "run"] }]
        }"#,
    );
    let reporter = Reporter::new(&scenario, false);
    let id = scenario.call_id("c").expect("call");
    let methods: Vec<_> = scenario
        .calls
        .call(id)
        .expect("call site")
        .candidates
        .iter()
        .filter_map(|method| scenario.store.method(*method))
        .collect();
    let rendered: Vec<String> = methods
        .iter()
        .map(|method| reporter.format_signature(method))
        .collect();
    assert_eq!(
        rendered,
        vec![
            "<T, U> List<T> Util.wrap(T, Object...)".to_string(),
            "void run(int[])".to_string(),
        ]
    );
}

#[test]
fn renders_best_ambiguous_and_inapplicable() {
    let scenario = scenario(
        r#"{
            "methods": [
                { "name": "f", "params": ["Integer"] },
                { "name": "g", "params": ["Object"] },
                { "name": "g", "params": ["Object"] },
                { "name": "h", "params": ["String"] }
            ],
            "calls": [
                { "id": "one", "candidates": ["f"], "args": ["Integer"] },
                { "id": "two", "candidates": ["g"], "args": ["Integer"] },
                { "id": "none", "candidates": ["h"], "args": ["Integer"] }
            ]
        }"#,
    );
    let reports = rank_calls(&scenario, &scenario.options, &[]).expect("ranked");
    let reporter = Reporter::new(&scenario, false);
    let text = reporter.render_text(&reports);

    assert!(text.contains("call one: 1 candidate\n"));
    assert!(text.contains("  * exact     void f(Integer)\n"));
    assert!(text.contains("  result: void"));
    assert!(text.contains("ambiguous: 2 candidates share the best rank"));
    assert!(text.contains("    inapplicable void h(String)\n"));
    assert!(text.contains("no applicable candidate"));
}

#[test]
fn renders_inaccessible_and_raw_bindings() {
    let scenario = scenario(
        r#"{
            "classes": [{ "name": "Owner" }, { "name": "Other" }, { "name": "List", "typeParams": ["E"] }],
            "methods": [
                { "name": "hidden", "owner": "Owner", "visibility": "private",
                  "typeParams": ["T"], "params": ["List<T>"] }
            ],
            "calls": [
                { "id": "c", "candidates": ["hidden"], "args": ["List"], "caller": "Other" }
            ]
        }"#,
    );
    let reports = rank_calls(&scenario, &scenario.options, &[]).expect("ranked");
    let reporter = Reporter::new(&scenario, false);

    let text = reporter.render_text(&reports);
    assert!(text.contains("(inaccessible)"));
    assert!(text.contains("{T -> <raw>}"));

    let json: serde_json::Value =
        serde_json::from_str(&reporter.render_json(&reports).expect("json")).expect("valid json");
    let candidate = &json[0]["candidates"][0];
    assert_eq!(candidate["accessible"], false);
    assert_eq!(candidate["best"], true);
    assert!(candidate["substitution"]["T"].is_null());
}

#[test]
fn colors_only_when_asked() {
    colored::control::set_override(true);
    let scenario = scenario(
        r#"{
            "methods": [{ "name": "f", "params": ["int"] }],
            "calls": [{ "id": "c", "candidates": ["f"], "args": ["int"] }]
        }"#,
    );
    let reports = rank_calls(&scenario, &scenario.options, &[]).expect("ranked");

    let plain = Reporter::new(&scenario, false).render_text(&reports);
    assert!(!plain.contains('\u{1b}'));
    let colored = Reporter::new(&scenario, true).render_text(&reports);
    assert!(colored.contains('\u{1b}'));
    colored::control::unset_override();
}

#[test]
fn applicability_labels() {
    assert_eq!(applicability_label(Applicability::Exact), "exact");
    assert_eq!(applicability_label(Applicability::Boxing), "boxing");
    assert_eq!(applicability_label(Applicability::VarArgs), "varargs");
    assert_eq!(applicability_label(Applicability::NotApplicable), "inapplicable");
}
