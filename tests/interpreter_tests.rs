//! End-to-end execution semantics, driven through the library facade on
//! inline script sources.

mod common;

use common::{failure_of, output_lines, result_of, run};
use kairos::error::{Error, ExecutionErrorKind};
use kairos::values::ValueError;
use kairos::Value;

fn execution_kind(source: &str) -> ExecutionErrorKind {
    match failure_of(source) {
        Error::Execution(e) => e.kind,
        other => panic!("expected an execution error, got {other:?}"),
    }
}

#[test]
fn return_yields_the_program_value() {
    assert!(matches!(result_of("return 5;"), Some(Value::Int(5))));
    assert!(matches!(result_of("return;"), Some(Value::Int(0))));
    assert!(result_of("print 1;").is_none());
}

#[test]
fn precedence_shapes_arithmetic_results() {
    assert!(matches!(result_of("return 1 + 2 * 3;"), Some(Value::Int(7))));
    assert!(matches!(result_of("return (1 + 2) * 3;"), Some(Value::Int(9))));
}

#[test]
fn variables_declare_assign_and_read() {
    assert!(matches!(result_of("var a = 5; return a;"), Some(Value::Int(5))));
    assert!(matches!(
        result_of("var a; a = 5; return a;"),
        Some(Value::Int(5))
    ));
}

#[test]
fn reading_an_uninitialized_variable_fails() {
    assert!(matches!(
        execution_kind("var a; return a;"),
        ExecutionErrorKind::UninitializedVariable(name) if name == "a"
    ));
}

#[test]
fn assigning_an_undeclared_variable_fails() {
    assert!(matches!(
        execution_kind("a = 5; return a;"),
        ExecutionErrorKind::UndeclaredVariable(name) if name == "a"
    ));
}

#[test]
fn initializer_sees_only_older_bindings() {
    // `var a = a;` declares first, so the read finds an empty slot.
    assert!(matches!(
        execution_kind("var a = a;"),
        ExecutionErrorKind::UninitializedVariable(_)
    ));
}

#[test]
fn functions_return_their_value_or_zero() {
    assert!(matches!(
        result_of("fun a() { return 5; }; return a();"),
        Some(Value::Int(5))
    ));
    assert!(matches!(
        result_of("fun a() { }; return a();"),
        Some(Value::Int(0))
    ));
}

#[test]
fn parameters_bind_in_a_fresh_scope() {
    let source = "var a = 5; fun b(c) { return c + 1; }; return b(a);";
    assert!(matches!(result_of(source), Some(Value::Int(6))));
}

#[test]
fn nested_return_unwinds_through_bodies() {
    let source = "fun a() { if 1 { return 5; }; }; return a();";
    assert!(matches!(result_of(source), Some(Value::Int(5))));
}

#[test]
fn statements_after_a_return_do_not_run() {
    let outcome = run("return 7; print \"unreachable\";");
    assert!(matches!(outcome.result, Some(Value::Int(7))));
    assert!(outcome.output.is_empty());

    let outcome = run("fun f() { return 1; print \"unreachable\"; }; f();");
    assert!(outcome.output.is_empty());
}

#[test]
fn calling_an_undeclared_function_fails() {
    assert!(matches!(
        execution_kind("return a();"),
        ExecutionErrorKind::UndeclaredFunction(name) if name == "a"
    ));
}

#[test]
fn arity_must_match() {
    assert!(matches!(
        execution_kind("fun f(a, b) { return a; }; return f(1);"),
        ExecutionErrorKind::ArityMismatch {
            expected: 2,
            got: 1,
            ..
        }
    ));
}

#[test]
fn free_names_resolve_through_the_live_scope_stack() {
    // Not closures: the body sees whatever is in scope at call time.
    let source = "fun f() { return x; }; var x = 42; return f();";
    assert!(matches!(result_of(source), Some(Value::Int(42))));

    let source = "\
fun g() { return i.days; };
var total = 0;
from 01.01.2020 to 02.01.2020 by days as i { total = total + g(); };
return total;";
    assert!(matches!(result_of(source), Some(Value::Int(3))));
}

#[test]
fn missing_free_names_fail_at_call_time() {
    assert!(matches!(
        execution_kind("fun a(b) { return c + 1; }; return a(1);"),
        ExecutionErrorKind::UndeclaredVariable(name) if name == "c"
    ));
}

#[test]
fn recursion_reaches_the_global_binding() {
    let source = "\
fun fact(n) { if n <= 1 { return 1; }; return n * fact(n - 1); };
return fact(5);";
    assert!(matches!(result_of(source), Some(Value::Int(120))));
}

#[test]
fn if_selects_by_truthiness() {
    let source = "var a; if 1 { a = 5; } else { a = 6; }; return a;";
    assert!(matches!(result_of(source), Some(Value::Int(5))));
    let source = "var a; if 0 { a = 5; } else { a = 6; }; return a;";
    assert!(matches!(result_of(source), Some(Value::Int(6))));
    let source = "var a = 1; if \"\" { a = 2; }; return a;";
    assert!(matches!(result_of(source), Some(Value::Int(1))));
}

#[test]
fn bodies_get_their_own_scope() {
    assert!(matches!(
        execution_kind("if 1 { var inner = 5; }; return inner;"),
        ExecutionErrorKind::UndeclaredVariable(name) if name == "inner"
    ));
    assert!(matches!(
        execution_kind("from 1 to 0 by days as i { }; return i;"),
        ExecutionErrorKind::UndeclaredVariable(_)
    ));
}

#[test]
fn from_loop_is_inclusive_of_the_end() {
    let source = "\
var a = 0;
from 00:00:00 to 00:00:05 by seconds as d { a = a + 1; };
return a;";
    assert!(matches!(result_of(source), Some(Value::Int(6))));
}

#[test]
fn from_iterator_carries_the_current_value() {
    let source = "\
var a = 0;
from 00:00:00 to 00:00:02 by seconds as d { a = a + d.seconds; };
return a;";
    assert!(matches!(result_of(source), Some(Value::Int(3))));
}

#[test]
fn from_iterator_shadows_outer_variables() {
    let source = "\
var a = 0;
from 00:00:00 to 00:00:10 by seconds as a { a = a + '1s'; };
return a;";
    assert!(matches!(result_of(source), Some(Value::Int(0))));
}

#[test]
fn from_over_integers_fails_when_stepping() {
    assert!(matches!(
        execution_kind("from 5 to 6 by seconds as d { };"),
        ExecutionErrorKind::Value(ValueError::BinaryTypeMismatch { .. })
    ));
}

#[test]
fn from_with_unorderable_bounds_fails() {
    assert!(matches!(
        execution_kind("from 00:00:00 to 01.01.2000 by years as d { };"),
        ExecutionErrorKind::Value(ValueError::NotOrdered { .. })
    ));
}

#[test]
fn from_by_years_clamps_leap_days() {
    let lines = output_lines(
        "from 29.02.2020 to 01.03.2022 by years as d { print d; };",
    );
    assert_eq!(
        vec!["29.02.2020", "28.02.2021~00:00:00", "28.02.2022~00:00:00"],
        lines
    );
}

#[test]
fn return_inside_a_loop_stops_iteration() {
    let source = "\
fun first(d1, d2) { from d1 to d2 by days as d { return d; }; };
print first(01.01.2020, 31.01.2020);";
    assert_eq!(vec!["01.01.2020"], output_lines(source));
}

#[test]
fn walking_days_between_datetime_and_date() {
    let source = "\
fun printDaysBetweenDates(d1,d2){from d1 to d2 by days as d3{print d3;};return 0;};
var dt = 10.04.2018~10:57:00;
var d  = 12.04.2018;
printDaysBetweenDates(dt, d);";
    assert_eq!(
        vec!["10.04.2018~10:57:00", "11.04.2018~10:57:00"],
        output_lines(source)
    );
}

#[test]
fn deadline_check_combines_spans_and_comparisons() {
    let source = "\
var start_time = 10.06.2020;
var delay      = '5D';
var prev_t1    = 25.05.2020;
var prev_t2    = 20.05.2020;
if start_time + (prev_t1 - prev_t2) + delay <= 20.06.2020 { print \"we have time\"; }
else { print \"we dont have time\"; };";
    assert_eq!(vec!["we have time"], output_lines(source));
}

#[test]
fn hours_between_times_concatenates_into_a_message() {
    let source = "\
var t1=15:57:23; var t2=20:45:00; var td=t2-t1; var h=td.hours;
var s = \"hours between \" + t1 + \" and \" + t2 + \" : \";
print s + h;";
    assert_eq!(
        vec!["hours between 15:57:23 and 20:45:00 : 4"],
        output_lines(source)
    );
}

#[test]
fn print_uses_canonical_display_forms() {
    let lines = output_lines(
        "\
print 42;
print \"plain text\";
print 01.02.2003;
print 04:05:06;
print 01.02.2003~04:05:06;
print '1D';
print 2 == 2;
print 2 != 2;",
    );
    assert_eq!(
        vec![
            "42",
            "plain text",
            "01.02.2003",
            "04:05:06",
            "01.02.2003~04:05:06",
            "'0Y 0M 0W 1D 0h 0m 0s'",
            "1",
            "0",
        ],
        lines
    );
}

#[test]
fn logic_operators_yield_zero_or_one_and_do_not_short_circuit() {
    assert!(matches!(result_of("return 2 | 0;"), Some(Value::Int(1))));
    assert!(matches!(result_of("return 0 & 3;"), Some(Value::Int(0))));
    assert!(matches!(result_of("return !5;"), Some(Value::Int(0))));
    assert!(matches!(result_of("return !0;"), Some(Value::Int(1))));
    // Strict evaluation: the right side runs even when the left decides.
    assert!(matches!(
        execution_kind("var a = 0; return a & b;"),
        ExecutionErrorKind::UndeclaredVariable(name) if name == "b"
    ));
}

#[test]
fn operator_type_mismatches_carry_the_operator_position() {
    let source = "var t = 10:00:00;\nreturn 1 + t;";
    match failure_of(source) {
        Error::Execution(e) => {
            assert!(matches!(
                e.kind,
                ExecutionErrorKind::Value(ValueError::BinaryTypeMismatch { .. })
            ));
            assert_eq!(2, e.pos.line);
            assert_eq!(9, e.pos.column);
        }
        other => panic!("expected an execution error, got {other:?}"),
    }
}

#[test]
fn division_by_zero_is_an_execution_error() {
    assert!(matches!(
        execution_kind("return 1 / 0;"),
        ExecutionErrorKind::Value(ValueError::DivisionByZero)
    ));
}

#[test]
fn timedelta_division_floors_each_field() {
    let source = "var td = '2M 10D'; print td / 2;";
    assert_eq!(vec!["'0Y 1M 0W 5D 0h 0m 0s'"], output_lines(source));
}

#[test]
fn time_info_access_reads_fields() {
    let source = "\
var d = 12.04.2018~10:57:03;
print d.years; print d.months; print d.days;
print d.hours; print d.minutes; print d.seconds;";
    assert_eq!(vec!["2018", "4", "12", "10", "57", "3"], output_lines(source));
}

#[test]
fn time_info_on_the_wrong_kind_fails() {
    assert!(matches!(
        execution_kind("var d = 01.01.2020; return d.hours;"),
        ExecutionErrorKind::Value(ValueError::NoSuchField { .. })
    ));
    assert!(matches!(
        execution_kind("return 5.days;"),
        ExecutionErrorKind::Value(ValueError::NoSuchField { .. })
    ));
}

#[test]
fn parenthesised_results_take_access() {
    let source = "var a = 10.06.2020; var b = 05.06.2020; return (a - b).days;";
    assert!(matches!(result_of(source), Some(Value::Int(5))));
}

#[test]
fn statement_calls_discard_but_still_run() {
    let source = "fun shout() { print \"ran\"; return 9; }; shout();";
    let outcome = run(source);
    assert_eq!("ran\n", outcome.output);
    assert!(outcome.result.is_none());
}

#[test]
fn calendar_overflow_surfaces_as_an_execution_error() {
    assert!(matches!(
        execution_kind("return 31.12.9999 + '1D';"),
        ExecutionErrorKind::Value(ValueError::YearOutOfRange(_))
    ));
    assert!(matches!(
        execution_kind("return 00:00:00 - '1s';"),
        ExecutionErrorKind::Value(ValueError::YearOutOfRange(_))
    ));
}

#[test]
fn unclosed_comment_warns_but_executes() {
    let outcome = run("print 1; #dangling");
    assert_eq!("1\n", outcome.output);
    assert_eq!(1, outcome.warnings.len());
}
