use super::*;
use crate::test_fixtures::Fixture;

#[test]
fn test_identity_method() {
    let fx = Fixture::new();
    let (method, params) = fx.generic_method("id", &["T"]);
    let t = Type::param(params[0]);
    fx.signature(method, vec![t.clone()], t);

    let substitution = fx.infer(method, vec![Some(fx.string_type())]);
    assert_eq!(substitution.get_type(params[0]), Some(&fx.string_type()));
}

#[test]
fn test_inference_under_trace_logging() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        let fx = Fixture::new();
        let (method, params) = fx.generic_method("pair", &["T"]);
        let t = Type::param(params[0]);
        fx.signature(method, vec![t.clone(), t.clone()], t);

        let substitution = fx.infer(
            method,
            vec![Some(fx.integer_type()), Some(fx.long_type())],
        );
        assert_eq!(substitution.get_type(params[0]), Some(&fx.number_type()));
    });
}

#[test]
fn test_unrelated_arguments_meet_at_root() {
    let fx = Fixture::new();
    let (method, params) = fx.generic_method("pick", &["T"]);
    let t = Type::param(params[0]);
    fx.signature(method, vec![t.clone(), t.clone()], t);

    let substitution = fx.infer(method, vec![Some(fx.string_type()), Some(fx.integer_type())]);
    assert_eq!(substitution.get_type(params[0]), Some(&fx.object_type()));
}

#[test]
fn test_inference_through_supertypes() {
    let fx = Fixture::new();
    let (method, params) = fx.generic_method("first", &["E"]);
    let e = Type::param(params[0]);
    fx.signature(method, vec![fx.collection_of(e.clone())], e);

    let substitution = fx.infer(method, vec![Some(fx.array_list_of(fx.integer_type()))]);
    assert_eq!(substitution.get_type(params[0]), Some(&fx.integer_type()));
}

#[test]
fn test_upper_bound_only() {
    let fx = Fixture::new();
    let (method, params) = fx.generic_method("fill", &["T"]);
    fx.signature(
        method,
        vec![fx.list_of(Type::super_of(Type::param(params[0])))],
        Type::VOID,
    );

    let substitution = fx.infer(method, vec![Some(fx.list_of(fx.number_type()))]);
    assert_eq!(substitution.get_type(params[0]), Some(&fx.number_type()));
}

#[test]
fn test_reconciliation_through_bounds() {
    let fx = Fixture::new();
    let (method, params) = fx.generic_method("head", &["T", "L"]);
    let (t, l) = (params[0], params[1]);
    fx.store.set_bounds(l, vec![fx.list_of(Type::param(t))]);
    fx.signature(method, vec![Type::param(l)], Type::param(t));

    let substitution = fx.infer(method, vec![Some(fx.array_list_of(fx.string_type()))]);
    assert_eq!(substitution.get_type(t), Some(&fx.string_type()));
    assert_eq!(
        substitution.get_type(l),
        Some(&fx.array_list_of(fx.string_type()))
    );
}

#[test]
fn test_failure_makes_every_parameter_unbound() {
    let fx = Fixture::new();
    let (method, params) = fx.generic_method("zip", &["T", "U"]);
    let list_t = fx.list_of(Type::param(params[0]));
    fx.signature(
        method,
        vec![list_t.clone(), list_t, Type::param(params[1])],
        Type::VOID,
    );

    let substitution = fx.infer(
        method,
        vec![
            Some(fx.list_of(Type::extends(fx.number_type()))),
            Some(fx.list_of(Type::extends(fx.integer_type()))),
            Some(fx.string_type()),
        ],
    );
    assert!(substitution.is_raw_for(&params));
}

#[test]
fn test_conflicting_exact_answers_make_every_parameter_unbound() {
    let fx = Fixture::new();
    let (method, params) = fx.generic_method("pair", &["T", "U"]);
    let list_t = fx.list_of(Type::param(params[0]));
    fx.signature(
        method,
        vec![list_t.clone(), list_t, Type::param(params[1])],
        Type::VOID,
    );

    let substitution = fx.infer(
        method,
        vec![
            Some(fx.list_of(fx.string_type())),
            Some(fx.list_of(fx.integer_type())),
            Some(fx.string_type()),
        ],
    );
    assert!(substitution.is_raw_for(&params));
}

#[test]
fn test_raw_argument_makes_every_parameter_unbound() {
    let fx = Fixture::new();
    let (method, params) = fx.generic_method("m", &["T", "U"]);
    fx.signature(
        method,
        vec![fx.list_of(Type::param(params[0])), Type::param(params[1])],
        Type::VOID,
    );

    let substitution = fx.infer(
        method,
        vec![Some(Type::raw(fx.array_list)), Some(fx.string_type())],
    );
    assert!(substitution.is_raw_for(&params));
}

#[test]
fn test_no_evidence_is_unbound() {
    let fx = Fixture::new();
    let (method, params) = fx.generic_method("make", &["T"]);
    fx.signature(method, vec![], Type::param(params[0]));

    let substitution = fx.infer(method, vec![]);
    assert!(substitution.is_raw_for(&params));
}

#[test]
fn test_untyped_arguments_are_skipped() {
    let fx = Fixture::new();
    let (method, params) = fx.generic_method("pick", &["T"]);
    let t = Type::param(params[0]);
    fx.signature(method, vec![t.clone(), t.clone()], t);

    let substitution = fx.infer(method, vec![None, Some(fx.long_type())]);
    assert_eq!(substitution.get_type(params[0]), Some(&fx.long_type()));
}

#[test]
fn test_partial_substitution_is_kept() {
    let fx = Fixture::new();
    let (method, params) = fx.generic_method("id", &["T"]);
    let t = Type::param(params[0]);
    fx.signature(method, vec![t.clone()], t);
    let receiver = fx.list_e;

    let info = fx.method(method);
    let args = vec![ArgumentInfo::typed(fx.string_type())];
    let partial = Substitution::from_pairs([(receiver, fx.integer_type())]);
    let request = InferenceRequest::new(&info, &args, &partial);
    let substitution = fx
        .engine()
        .infer_type_arguments(&mut InferenceSession::new(), &request);

    assert_eq!(substitution.get_type(receiver), Some(&fx.integer_type()));
    assert_eq!(substitution.get_type(params[0]), Some(&fx.string_type()));
}

#[test]
fn test_self_referential_answer_is_left_as_identity() {
    let fx = Fixture::new();
    let (method, params) = fx.generic_method("id", &["T"]);
    let t = Type::param(params[0]);
    fx.signature(method, vec![t.clone()], t.clone());

    let substitution = fx.infer(method, vec![Some(fx.list_of(t.clone()))]);
    assert!(!substitution.contains(params[0]));
    assert_eq!(substitution.substitute(&t), Some(t));
}

#[test]
fn test_outcomes() {
    let fx = Fixture::new();
    let (method, params) = fx.generic_method("id", &["T"]);
    let t = Type::param(params[0]);
    fx.signature(method, vec![t.clone()], t.clone());
    let info = fx.method(method);
    let partial = Substitution::new();
    let engine = fx.engine();

    let args = vec![ArgumentInfo::typed(fx.string_type())];
    let request = InferenceRequest::new(&info, &args, &partial);
    assert_eq!(
        engine.infer_outcomes(&mut InferenceSession::new(), &request),
        vec![(params[0], InferenceOutcome::Resolved(fx.string_type()))]
    );

    let args = vec![ArgumentInfo::typed(Type::raw(fx.list))];
    let list_method = fx.generic_method("take", &["E"]);
    fx.signature(
        list_method.0,
        vec![fx.list_of(Type::param(list_method.1[0]))],
        Type::VOID,
    );
    let list_info = fx.method(list_method.0);
    let request = InferenceRequest::new(&list_info, &args, &partial);
    assert_eq!(
        engine.infer_outcomes(&mut InferenceSession::new(), &request),
        vec![(list_method.1[0], InferenceOutcome::Unbound)]
    );

    let args = vec![ArgumentInfo::typed(fx.list_of(t.clone()))];
    let request = InferenceRequest::new(&info, &args, &partial);
    assert_eq!(
        engine.infer_outcomes(&mut InferenceSession::new(), &request),
        vec![(params[0], InferenceOutcome::Resolved(t))]
    );
}

#[test]
fn test_single_parameter_entry_point() {
    let fx = Fixture::new();
    let (method, params) = fx.generic_method("pair", &["T", "U"]);
    fx.signature(
        method,
        vec![Type::param(params[0]), Type::param(params[0])],
        Type::param(params[1]),
    );
    let info = fx.method(method);
    let args = vec![
        ArgumentInfo::typed(Type::INT),
        ArgumentInfo::typed(fx.long_type()),
    ];
    let partial = Substitution::new();
    let request = InferenceRequest::new(&info, &args, &partial);
    let engine = fx.engine();
    let mut session = InferenceSession::new();

    assert_eq!(
        engine.infer_type_for_parameter(&mut session, params[0], &request),
        Some(fx.number_type())
    );
    assert_eq!(
        engine.infer_type_for_parameter(&mut session, params[1], &request),
        None
    );
}

#[test]
fn test_type_pairs() {
    let fx = Fixture::new();
    let (_, params) = fx.generic_method("m", &["T", "U", "N"]);
    let (t, u, n) = (params[0], params[1], params[2]);
    fx.store.set_bounds(n, vec![fx.number_type()]);
    let engine = fx.engine();

    let left = vec![
        fx.list_of(Type::super_of(Type::param(u))),
        fx.list_of(Type::param(t)),
        fx.list_of(Type::super_of(Type::param(u))),
        fx.list_of(Type::param(t)),
    ];
    let right = vec![
        fx.list_of(fx.integer_type()),
        fx.list_of(fx.string_type()),
        fx.list_of(fx.long_type()),
        fx.list_of(fx.integer_type()),
    ];
    let substitution = engine
        .infer_from_type_pairs(&params, &left, &right)
        .expect("aligned lists");

    assert_eq!(substitution.get_type(t), Some(&fx.string_type()));
    assert_eq!(substitution.get_type(u), Some(&fx.number_type()));
    assert_eq!(substitution.get_type(n), Some(&fx.number_type()));
}

#[test]
fn test_type_pairs_lower_bounds_fall_back_to_erasure() {
    let fx = Fixture::new();
    let (_, params) = fx.generic_method("m", &["T"]);
    let substitution = fx
        .engine()
        .infer_from_type_pairs(&params, &[Type::param(params[0])], &[fx.string_type()])
        .expect("aligned lists");
    assert_eq!(substitution.get_type(params[0]), Some(&fx.object_type()));
}

#[test]
fn test_type_pairs_length_mismatch() {
    let fx = Fixture::new();
    let (_, params) = fx.generic_method("m", &["T"]);
    let result = fx
        .engine()
        .infer_from_type_pairs(&params, &[fx.string_type()], &[]);
    assert_eq!(
        result,
        Err(InferenceError::ArityMismatch {
            expected: 1,
            actual: 0
        })
    );
    if let Err(err) = result {
        assert!(err.to_string().contains("same length"));
    }
}

#[test]
fn test_concurrent_requests_share_one_store() {
    use rayon::prelude::*;

    let fx = Fixture::new();
    let (method, params) = fx.generic_method("pick", &["T"]);
    let t = Type::param(params[0]);
    fx.signature(method, vec![t.clone(), t.clone()], t);

    let results: Vec<Substitution> = (0..64)
        .into_par_iter()
        .map(|index| {
            let second = if index % 2 == 0 {
                fx.long_type()
            } else {
                Type::INT
            };
            fx.infer(method, vec![Some(fx.integer_type()), Some(second)])
        })
        .collect();

    for (index, substitution) in results.iter().enumerate() {
        let expected = if index % 2 == 0 {
            fx.number_type()
        } else {
            fx.integer_type()
        };
        assert_eq!(substitution.get_type(params[0]), Some(&expected));
    }
}
