//! Canonical writer for workflow documents
//!
//! The output layout is fixed so that regenerating a workflow from the same
//! source tree yields byte-identical files:
//!
//! ```text
//! apiVersion: <version>
//! kind: <kind>
//! name: <name>
//!
//! on:
//!   push:
//!     branches:
//!       - '**'
//!
//! jobs:
//!   <job>:
//!     steps:
//!       - id: ...
//!         name: ...
//!         if: ...
//!         uses: ...
//!         run: |-
//!           ...
//!         with:
//!           key: value
//! ```
//!
//! Jobs are sorted by name and jobs without steps are dropped. Steps keep
//! their order. Only the frame is laid out here; every key and scalar is
//! encoded by `serde_yaml`, which picks quoting and block styles.

use super::model::{BranchTrigger, Step, Triggers, Workflow};
use crate::error::{Result, WorkflowError};
use serde::Serialize;
use serde_yaml::{Mapping, Value};

const STEP_FIELD_INDENT: usize = 8;
const STEP_ITEM_PREFIX: &str = "      - ";

/// Render a workflow in its canonical textual form
pub fn to_canonical_yaml(workflow: &Workflow) -> Result<String> {
    let mut out = String::new();

    push_entry(&mut out, 0, "apiVersion", &workflow.api_version)?;
    push_entry(&mut out, 0, "kind", &workflow.kind)?;
    push_entry(&mut out, 0, "name", &workflow.name)?;

    push_separator(&mut out);
    push_triggers(&mut out, &workflow.triggers)?;

    let mut jobs = workflow.visible_jobs().peekable();
    if jobs.peek().is_some() {
        push_separator(&mut out);
        out.push_str("jobs:\n");
        for (name, job) in jobs {
            push_key(&mut out, 2, name)?;
            out.push_str("    steps:\n");
            for step in &job.steps {
                push_step(&mut out, step)?;
            }
        }
    }

    Ok(out)
}

/// Encode one fragment. A trailing `|+` block makes the emitter close the
/// document with `...`, which must not end up inside the frame.
fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut text = serde_yaml::to_string(value).map_err(WorkflowError::Encode)?;
    if text.ends_with("\n...\n") {
        text.truncate(text.len() - "...\n".len());
    }
    Ok(text)
}

/// Blank line between sections. A `|+` block already ends in one and would
/// absorb a second into its content.
fn push_separator(out: &mut String) {
    if !out.ends_with("\n\n") {
        out.push('\n');
    }
}

/// Append `text` line by line, shifted right by `indent`. Blank lines stay empty.
fn push_indented(out: &mut String, indent: usize, text: &str) {
    let pad = " ".repeat(indent);
    for line in text.lines() {
        if !line.is_empty() {
            out.push_str(&pad);
            out.push_str(line);
        }
        out.push('\n');
    }
}

fn single_entry(key: &str, value: Value) -> Mapping {
    let mut mapping = Mapping::new();
    mapping.insert(Value::String(key.to_string()), value);
    mapping
}

/// Write `key: value` at `indent`
fn push_entry(out: &mut String, indent: usize, key: &str, value: &str) -> Result<()> {
    let text = encode(&single_entry(key, Value::String(value.to_string())))?;
    push_indented(out, indent, &text);
    Ok(())
}

/// Write `key:` at `indent`, opening a nested block
fn push_key(out: &mut String, indent: usize, key: &str) -> Result<()> {
    let text = encode(&single_entry(key, Value::Null))?;
    let opened = text.strip_suffix(" null\n").unwrap_or(&text);
    push_indented(out, indent, opened);
    Ok(())
}

fn push_triggers(out: &mut String, triggers: &Triggers) -> Result<()> {
    if triggers.is_empty() {
        out.push_str("on: {}\n");
        return Ok(());
    }

    out.push_str("on:\n");
    if let Some(push) = &triggers.push {
        push_branch_trigger(out, "push", push)?;
    }
    if let Some(pull_request) = &triggers.pull_request {
        push_branch_trigger(out, "pull_request", pull_request)?;
    }
    Ok(())
}

fn push_branch_trigger(out: &mut String, event: &str, trigger: &BranchTrigger) -> Result<()> {
    out.push_str(&format!("  {}:\n", event));
    if trigger.branches.is_empty() {
        out.push_str("    branches: []\n");
        return Ok(());
    }
    out.push_str("    branches:\n");
    push_indented(out, 6, &encode(&trigger.branches)?);
    Ok(())
}

fn push_step(out: &mut String, step: &Step) -> Result<()> {
    let indent = STEP_FIELD_INDENT;
    let mut fields = String::new();

    if let Some(id) = &step.id {
        push_entry(&mut fields, indent, "id", id)?;
    }
    if let Some(name) = &step.name {
        push_entry(&mut fields, indent, "name", name)?;
    }
    if let Some(condition) = &step.condition {
        push_entry(&mut fields, indent, "if", condition)?;
    }
    push_entry(&mut fields, indent, "uses", &step.uses)?;
    if let Some(run) = &step.run {
        push_entry(&mut fields, indent, "run", run)?;
    }
    if !step.with.is_empty() {
        push_key(&mut fields, indent, "with")?;
        for (key, value) in &step.with {
            push_entry(&mut fields, indent + 2, key, value)?;
        }
    }

    // `uses` is always written, so the first line carries the full indent
    out.push_str(STEP_ITEM_PREFIX);
    out.push_str(&fields[indent..]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{from_yaml_str, Job};
    use std::path::Path;

    fn round_trip(workflow: &Workflow) -> Workflow {
        let text = to_canonical_yaml(workflow).unwrap();
        from_yaml_str(&text, Path::new("test.yaml"))
            .unwrap_or_else(|e| panic!("failed to read back:\n{}\n{}", text, e))
    }

    #[test]
    fn test_base_workflow_layout() {
        let text = to_canonical_yaml(&Workflow::base()).unwrap();
        assert_eq!(
            text,
            "apiVersion: automation.cloudbees.io/v1alpha1\n\
             kind: workflow\n\
             name: build\n\
             \n\
             on:\n  push:\n    branches:\n      - '**'\n"
        );
    }

    #[test]
    fn test_step_field_order_and_block_run() {
        let mut wf = Workflow::base();
        wf.add_job(
            "test",
            Job::new(vec![Step::new("install", "docker://python:3")
                .with_param("language", "PY")
                .with_run("python -m pip install --upgrade pip\npip install -r requirements.txt")
                .with_condition("true")
                .with_id("deps")]),
        )
        .unwrap();

        let text = to_canonical_yaml(&wf).unwrap();
        let expected_jobs = "\njobs:\n  test:\n    steps:\n      - id: deps\n        name: install\n        if: 'true'\n        uses: docker://python:3\n        run: |-\n          python -m pip install --upgrade pip\n          pip install -r requirements.txt\n        with:\n          language: PY\n";
        assert!(text.ends_with(expected_jobs), "got:\n{}", text);
    }

    #[test]
    fn test_jobs_sorted_and_empty_jobs_dropped() {
        let mut wf = Workflow::base();
        wf.add_job("b-build", Job::new(vec![Step::new("x", "u")])).unwrap();
        wf.add_job("a-build", Job::new(vec![Step::new("y", "u")])).unwrap();
        wf.add_job("c-empty", Job::default()).unwrap();

        let text = to_canonical_yaml(&wf).unwrap();
        let a = text.find("  a-build:").unwrap();
        let b = text.find("  b-build:").unwrap();
        assert!(a < b);
        assert!(!text.contains("c-empty"));
    }

    #[test]
    fn test_only_empty_jobs_omits_jobs_section() {
        let mut wf = Workflow::base();
        wf.add_job("empty", Job::default()).unwrap();

        let text = to_canonical_yaml(&wf).unwrap();
        assert!(!text.contains("jobs:"));
        assert_eq!(text, to_canonical_yaml(&Workflow::base()).unwrap());
    }

    #[test]
    fn test_no_trailing_whitespace() {
        let mut wf = Workflow::base();
        wf.add_job(
            "j",
            Job::new(vec![Step::new("multi", "u").with_run("a\n\nb\n")]),
        )
        .unwrap();

        let text = to_canonical_yaml(&wf).unwrap();
        for line in text.lines() {
            assert_eq!(line, line.trim_end(), "trailing whitespace in {:?}", line);
        }
    }

    #[test]
    fn test_ambiguous_scalars_are_quoted() {
        let mut wf = Workflow::base();
        wf.add_job(
            "j",
            Job::new(vec![Step::new("s", "u")
                .with_param("flag", "true")
                .with_param("version", "8.0")
                .with_param("image", "docker://golang:1.22-alpine3.19")]),
        )
        .unwrap();

        let text = to_canonical_yaml(&wf).unwrap();
        assert!(text.contains("          flag: 'true'\n"), "got:\n{}", text);
        assert!(text.contains("          version: '8.0'\n"), "got:\n{}", text);
        assert!(text.contains("          image: docker://golang:1.22-alpine3.19\n"));
        assert_eq!(round_trip(&wf), wf);
    }

    #[test]
    fn test_keep_block_before_section_break() {
        let mut wf = Workflow::base();
        wf.name = "x\n\n".to_string();
        wf.triggers.push = Some(BranchTrigger {
            branches: vec!["y\n\n".to_string()],
        });
        wf.add_job("j", Job::new(vec![Step::new("s", "u").with_run("z\n\n")]))
            .unwrap();

        let text = to_canonical_yaml(&wf).unwrap();
        assert!(!text.contains("\n...\n"), "got:\n{}", text);
        assert!(!text.contains("\n\n\n"), "got:\n{}", text);
        assert_eq!(round_trip(&wf), wf);
    }

    #[test]
    fn test_round_trip_noncharacters_and_line_breaks() {
        let awkward = [
            "\u{FFFE}",
            "a\u{ffff}b",
            "**",
            "true",
            "8.0",
            "a\nb",
            "  lead\nx",
            "x\n\n",
            "line\r\nline",
            "# not a comment",
            "- dash",
            "key: value",
        ];

        for value in awkward {
            let mut wf = Workflow::base();
            wf.name = value.to_string();
            wf.triggers.push = Some(BranchTrigger {
                branches: vec![value.to_string()],
            });
            wf.add_job(
                value,
                Job::new(vec![Step::new(value, value)
                    .with_id(value)
                    .with_condition(value)
                    .with_run(value)
                    .with_param(value, value)]),
            )
            .unwrap();

            assert_eq!(round_trip(&wf), wf, "value {:?}", value);
        }
    }

    #[test]
    fn test_round_trip_awkward_scalars() {
        let mut wf = Workflow::base();
        wf.name = "it's: a test".to_string();
        wf.triggers.pull_request = Some(BranchTrigger {
            branches: vec!["main".to_string(), "release/*".to_string()],
        });
        wf.add_job(
            "odd",
            Job::new(vec![
                Step::new("", "u")
                    .with_run("  leading space\nsecond")
                    .with_param("empty", "")
                    .with_param("num", "42")
                    .with_param("quote", "say \"hi\"")
                    .with_param("tab", "a\tb"),
                Step::new("null", "~")
                    .with_run("trailing newline\n")
                    .with_condition("${{ github.ref == 'refs/heads/main' }}"),
                Step::new("crlf", "u").with_run("line one\r\nline two"),
                Step::new("double newline", "u").with_run("x\n\n"),
            ]),
        )
        .unwrap();

        assert_eq!(round_trip(&wf), wf);
    }

    #[test]
    fn test_round_trip_empty_branches_and_no_triggers() {
        let mut wf = Workflow::base();
        wf.triggers.push = Some(BranchTrigger { branches: vec![] });
        assert_eq!(round_trip(&wf), wf);

        wf.triggers = Triggers::default();
        assert!(to_canonical_yaml(&wf).unwrap().contains("on: {}\n"));
        assert_eq!(round_trip(&wf), wf);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let mut wf = Workflow::base();
        for name in ["zz", "aa", "mm"] {
            wf.add_job(
                name,
                Job::new(vec![Step::new("s", "u").with_param("b", "2").with_param("a", "1")]),
            )
            .unwrap();
        }
        let first = to_canonical_yaml(&wf).unwrap();
        let second = to_canonical_yaml(&round_trip(&wf)).unwrap();
        assert_eq!(first, second);
    }
}
