//! .NET projects built from SDK-style `.csproj` files
//!
//! The build image follows the newest supported target framework found across
//! all SDK projects. When the tree holds Visual Studio solutions, each one is
//! built and tested; otherwise a throwaway solution is assembled from every
//! project at CI time.

use super::{checkout_step, scan_step, DetectionContext, Detector};
use crate::error::Result;
use crate::workflow::Step;
use roxmltree::Document;
use std::path::{Path, PathBuf};
use tracing::debug;

const PROJECT_EXTENSION: &str = "csproj";
const SOLUTION_EXTENSION: &str = "sln";
const SOLUTION_HEADER: &str = "Microsoft Visual Studio Solution File";

const DEFAULT_FRAMEWORK: &str = "net8.0";

/// Supported target frameworks, newest first
const SDK_IMAGES: [(&str, &str); 4] = [
    ("net8.0", "docker://mcr.microsoft.com/dotnet/sdk:8.0"),
    ("net7.0", "docker://mcr.microsoft.com/dotnet/sdk:7.0"),
    ("net6.0", "docker://mcr.microsoft.com/dotnet/sdk:6.0"),
    ("net5.0", "docker://mcr.microsoft.com/dotnet/sdk:5.0"),
];

const CREATE_SOLUTION_RUN: &str =
    "dotnet new sln -n all-projects\nfind . -name \"*.csproj\" -print0 | xargs -0 dotnet sln add";

/// Rank of a framework in [`SDK_IMAGES`]; lower is newer
fn framework_rank(framework: &str) -> Option<usize> {
    SDK_IMAGES.iter().position(|(tfm, _)| *tfm == framework)
}

fn sdk_image(framework: &str) -> &'static str {
    SDK_IMAGES
        .iter()
        .find(|(tfm, _)| *tfm == framework)
        .or_else(|| SDK_IMAGES.iter().find(|(tfm, _)| *tfm == DEFAULT_FRAMEWORK))
        .map(|(_, image)| *image)
        .unwrap_or(SDK_IMAGES[0].1)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(extension)
}

/// Target frameworks of an SDK-style project, or `None` for anything else.
///
/// Only the first `PropertyGroup` declaring a framework counts. A project
/// without one builds with the default framework.
fn parse_sdk_project(content: &str) -> Option<Vec<String>> {
    let doc = Document::parse(content.trim_start_matches('\u{feff}')).ok()?;
    let project = doc.root_element();
    if !project.has_tag_name("Project") || project.attribute("Sdk").map_or(true, str::is_empty) {
        return None;
    }

    let declared = project
        .children()
        .filter(|n| n.has_tag_name("PropertyGroup"))
        .find_map(|group| {
            group.children().find_map(|prop| {
                let text = prop.text().map(str::trim).filter(|t| !t.is_empty())?;
                if prop.has_tag_name("TargetFramework") || prop.has_tag_name("TargetFrameworks") {
                    Some(text)
                } else {
                    None
                }
            })
        });

    let frameworks = match declared {
        Some(text) => text
            .split(';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        None => vec![DEFAULT_FRAMEWORK.to_string()],
    };
    Some(frameworks)
}

/// What the source tree says about its .NET build
#[derive(Debug, Default)]
struct DotnetProject {
    framework: Option<&'static str>,
    solutions: Vec<PathBuf>,
}

pub struct CSharpDetector;

impl CSharpDetector {
    /// `None` when the tree holds no SDK-style project
    fn scan(ctx: &DetectionContext<'_>) -> Result<Option<DotnetProject>> {
        let files = ctx.fs.walk_files(ctx.src_dir)?;

        let mut found_sdk_project = false;
        let mut best_rank: Option<usize> = None;

        for path in files.iter().filter(|p| has_extension(p, PROJECT_EXTENSION)) {
            let content = match ctx.fs.read_bytes(path) {
                Ok(raw) => String::from_utf8_lossy(&raw).into_owned(),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Skipping unreadable project");
                    continue;
                }
            };

            let Some(frameworks) = parse_sdk_project(&content) else {
                debug!(path = %path.display(), "Skipping non-SDK project");
                continue;
            };

            found_sdk_project = true;
            for rank in frameworks.iter().filter_map(|f| framework_rank(f)) {
                best_rank = Some(best_rank.map_or(rank, |best| best.min(rank)));
            }
        }

        if !found_sdk_project {
            return Ok(None);
        }

        let mut solutions = Vec::new();
        for path in files.iter().filter(|p| has_extension(p, SOLUTION_EXTENSION)) {
            let raw = ctx.fs.read_bytes(path)?;
            if String::from_utf8_lossy(&raw).contains(SOLUTION_HEADER) {
                solutions.push(path.clone());
            }
        }

        Ok(Some(DotnetProject {
            framework: best_rank.map(|rank| SDK_IMAGES[rank].0),
            solutions,
        }))
    }

    fn solution_steps(ctx: &DetectionContext<'_>, image: &str, solutions: &[PathBuf]) -> Vec<Step> {
        let mut relative: Vec<(String, String)> = solutions
            .iter()
            .map(|path| {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (ctx.display_relative(path), file_name)
            })
            .collect();
        relative.sort();

        let mut steps = Vec::with_capacity(relative.len() * 2);
        for (rel, file_name) in relative {
            let arg = if rel.contains(char::is_whitespace) {
                format!("\"{}\"", rel)
            } else {
                rel
            };
            steps.push(
                Step::new(format!("build {}", file_name), image)
                    .with_run(format!("dotnet build {}", arg)),
            );
            steps.push(
                Step::new(format!("Test {}", file_name), image)
                    .with_run(format!("dotnet test {}", arg)),
            );
        }
        steps
    }

    fn aggregate_steps(image: &str) -> Vec<Step> {
        vec![
            Step::new("Create solution", image).with_run(CREATE_SOLUTION_RUN),
            Step::new("Build", image).with_run("dotnet build ./all-projects.sln"),
            Step::new("Test", image).with_run("dotnet test ./all-projects.sln"),
        ]
    }
}

impl Detector for CSharpDetector {
    fn job_name(&self) -> &'static str {
        "csharp-build"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Option<Vec<Step>>> {
        let Some(project) = Self::scan(ctx)? else {
            return Ok(None);
        };

        let framework = project.framework.unwrap_or(DEFAULT_FRAMEWORK);
        let image = sdk_image(framework);
        debug!(
            framework,
            solutions = project.solutions.len(),
            "Detected .NET project"
        );

        let mut steps = vec![checkout_step()];
        if project.solutions.is_empty() {
            steps.extend(Self::aggregate_steps(image));
        } else {
            steps.extend(Self::solution_steps(ctx, image, &project.solutions));
        }
        steps.push(scan_step("Scan", "LANGUAGE_DOTNET"));
        Ok(Some(steps))
    }
}
