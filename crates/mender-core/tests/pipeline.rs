//! End-to-end tests for the repair pipeline
//!
//! Drives `Mender` through JSON request values and checks the rendered
//! response, mirroring what a caller sees.

use mender_core::render::{parse_rendered, ERRORS_HEADER};
use mender_core::{BatchRequest, Error, Mender, ToolCall, Value};
use pretty_assertions::assert_eq;
use serde_json::json;

fn calculator_batch(second_arguments: &str, strict: bool) -> serde_json::Value {
    json!({
        "tool_calls": [
            {
                "type": "function",
                "id": "call_0",
                "function": { "name": "calculator", "arguments": r#"{"operation":"add","x":10,"y":20}"# }
            },
            {
                "type": "function",
                "id": "call_1",
                "function": { "name": "calculator", "arguments": second_arguments }
            }
        ],
        "strict_mode": strict
    })
}

#[test]
fn lenient_batch_coerces_string_operands() {
    let mender = Mender::default();
    let text = mender
        .handle_value(calculator_batch(
            r#"{"operation":"multiply","x":"5","y":"3"}"#,
            false,
        ))
        .unwrap();

    assert!(!text.contains(ERRORS_HEADER));
    let result = parse_rendered(&text).unwrap();
    assert_eq!(result.calls.len(), 2);
    assert!(result.errors.is_empty());

    let second = result.calls[1].parameters.as_ref().unwrap();
    assert_eq!(second["operation"], Value::from("multiply"));
    assert_eq!(
        serde_json::to_value(second).unwrap(),
        json!({ "operation": "multiply", "x": 5, "y": 3 })
    );
    assert_eq!(
        result.calls[1].function.arguments,
        r#"{"operation":"multiply","x":5,"y":3}"#
    );
}

#[test]
fn strict_batch_drops_unparseable_call() {
    let mender = Mender::default();
    let text = mender
        .handle_value(calculator_batch("{operation: multiply}", true))
        .unwrap();

    let result = parse_rendered(&text).unwrap();
    assert_eq!(result.calls.len(), 1);
    assert_eq!(result.calls[0].id.as_deref(), Some("call_0"));
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("[1]"), "error: {}", result.errors[0]);
}

#[test]
fn lenient_batch_passes_unparseable_call_through_verbatim() {
    let mender = Mender::default();
    let text = mender
        .handle_value(calculator_batch("{operation: multiply}", false))
        .unwrap();

    let result = parse_rendered(&text).unwrap();
    assert_eq!(result.calls.len(), 2);
    assert_eq!(result.calls[1].function.arguments, "{operation: multiply}");
    assert_eq!(result.calls[1].parameters, None);
    assert!(result.errors[0].starts_with("tool call [1] failed: arguments are not valid JSON and could not be repaired"));
}

#[test]
fn output_never_exceeds_input_and_matches_when_lenient() {
    let arguments = [
        r#"{"operation":"add","x":1,"y":2}"#,
        "{bad",
        r#"{"operation":"pow","x":1,"y":2}"#,
        "",
        "```json\n{\"operation\":\"divide\",\"x\":\"9\",\"y\":\"3\"}\n```",
        r#"{"operation":"add","x":"z","y":2}"#,
    ];
    let calls: Vec<ToolCall> = arguments
        .iter()
        .enumerate()
        .map(|(i, args)| ToolCall::new("calculator", *args).with_id(i.to_string()))
        .collect();
    let mender = Mender::default();

    for strict in [false, true] {
        let result = mender
            .process(BatchRequest {
                tool_calls: calls.clone(),
                strict_mode: Some(strict),
            })
            .unwrap();

        assert!(result.calls.len() <= calls.len());
        if !strict {
            assert_eq!(result.calls.len(), calls.len());
        }

        // Retained calls keep their relative order.
        let ids: Vec<usize> = result
            .calls
            .iter()
            .map(|c| c.id.as_deref().unwrap().parse().unwrap())
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]), "ids out of order: {ids:?}");
    }
}

#[test]
fn strict_and_lenient_error_sets_differ_as_expected() {
    let calls = vec![
        ToolCall::new("calculator", "```json\n{\"operation\":\"add\",\"x\":1,\"y\":2}\n```"),
        ToolCall::new("calculator", r#"{"operation":"pow","x":1,"y":2}"#),
    ];
    let mender = Mender::default();

    let lenient = mender
        .process(BatchRequest {
            tool_calls: calls.clone(),
            strict_mode: Some(false),
        })
        .unwrap();
    // Salvage succeeds and validation failures are swallowed.
    assert!(lenient.is_clean());
    assert_eq!(
        lenient.calls[1].function.arguments,
        r#"{"operation":"pow","x":1,"y":2}"#
    );

    let strict = mender
        .process(BatchRequest {
            tool_calls: calls,
            strict_mode: Some(true),
        })
        .unwrap();
    assert!(strict.calls.is_empty());
    assert_eq!(strict.errors.len(), 2);
    assert!(strict.errors[0].starts_with("tool call [0] failed: arguments are not valid JSON:"));
    assert!(strict.errors[1].contains("invalid value 'pow' for parameter 'operation'"));
}

#[test]
fn reprocessing_rendered_output_is_stable() {
    let mender = Mender::default();
    let first = mender
        .handle_value(calculator_batch(
            r#"{"y":" 3.5 ","operation":"subtract","x":"TRUE"}"#,
            false,
        ))
        .unwrap();
    let first_result = parse_rendered(&first).unwrap();

    let second = mender
        .process(BatchRequest {
            tool_calls: first_result.calls.clone(),
            strict_mode: Some(false),
        })
        .unwrap();

    assert_eq!(second.calls, first_result.calls);
    assert_eq!(second.errors, first_result.errors);
}

#[test]
fn large_integers_are_stable_across_passes() {
    let mender = Mender::default();
    let run = |arguments: &str| {
        mender
            .process(BatchRequest {
                tool_calls: vec![ToolCall::new("lookup", arguments)],
                strict_mode: Some(true),
            })
            .unwrap()
            .calls
            .remove(0)
            .function
            .arguments
    };

    assert_eq!(run(r#"{"id":9007199254740993}"#), r#"{"id":9007199254740993}"#);

    let first = run(r#"{"id":"9007199254740993"}"#);
    assert_eq!(first, r#"{"id":9007199254740993}"#);
    assert_eq!(run(&first), first);
}

#[test]
fn multi_line_rejected_value_stays_on_one_error_line() {
    let mender = Mender::default();
    let text = mender
        .handle_value(calculator_batch(
            r#"{"operation":"po\nw","x":1,"y":2}"#,
            true,
        ))
        .unwrap();

    let result = parse_rendered(&text).unwrap();
    assert_eq!(
        result.errors,
        vec![r"tool call [1] failed: argument validation failed: invalid value 'po\nw' for parameter 'operation'"]
    );
    assert_eq!(text.lines().filter(|l| l.starts_with("- ")).count(), 1);
}

#[test]
fn arguments_round_trip_to_parameters() {
    let mender = Mender::default();
    let result = mender
        .process(BatchRequest {
            tool_calls: vec![
                ToolCall::new("calculator", r#"{"operation":"divide","x":"7.25","y":-3}"#),
                ToolCall::new("search", r#"{"q":" rust ","tags":["a","1"],"deep":{"n":"2"}}"#),
            ],
            strict_mode: Some(true),
        })
        .unwrap();

    for call in &result.calls {
        let decoded: serde_json::Value = serde_json::from_str(&call.function.arguments).unwrap();
        assert_eq!(decoded, serde_json::to_value(call.parameters.as_ref().unwrap()).unwrap());
    }
    // Nested values are untouched.
    assert_eq!(
        result.calls[1].function.arguments,
        r#"{"deep":{"n":"2"},"q":"rust","tags":["a","1"]}"#
    );
}

#[test]
fn request_level_errors_produce_no_output() {
    let mender = Mender::default();
    assert!(matches!(
        mender.handle_value(json!({ "tool_calls": [] })),
        Err(Error::EmptyBatch)
    ));
    assert!(matches!(
        mender.handle_value(json!([1, 2])),
        Err(Error::MalformedRequest(_))
    ));
}
