use super::{checkout_step, scan_step, DetectionContext, Detector};
use crate::error::Result;
use crate::workflow::Step;
use tracing::debug;

const MAVEN_IMAGE: &str = "docker://maven:3.9-eclipse-temurin-21-alpine";
const GRADLE_IMAGE: &str = "docker://gradle:8.6-jdk21-alpine";

/// Build files mapped to the steps they imply
struct BuildRecipe {
    files: &'static [&'static str],
    steps: &'static [(&'static str, &'static str, &'static str)],
}

/// Checked top to bottom; the first recipe with a matching file wins
const RECIPES: &[BuildRecipe] = &[
    BuildRecipe {
        files: &["mvnw"],
        steps: &[("mvn install", MAVEN_IMAGE, "./mvnw install")],
    },
    BuildRecipe {
        files: &["pom.xml"],
        steps: &[("mvn install", MAVEN_IMAGE, "mvn install")],
    },
    BuildRecipe {
        files: &["gradlew"],
        steps: &[
            ("gradle build", GRADLE_IMAGE, "./gradlew build"),
            ("gradle test", GRADLE_IMAGE, "./gradlew test"),
        ],
    },
    BuildRecipe {
        files: &["build.gradle", "build.gradle.kts"],
        steps: &[
            ("gradle build", GRADLE_IMAGE, "gradle build"),
            ("gradle test", GRADLE_IMAGE, "gradle test"),
        ],
    },
];

/// Maven and Gradle builds, wrapper scripts preferred
pub struct JavaDetector;

impl JavaDetector {
    fn matching_recipe(ctx: &DetectionContext<'_>) -> Result<Option<&'static BuildRecipe>> {
        for recipe in RECIPES {
            for file in recipe.files {
                if ctx.has_file(file)? {
                    debug!(file, "Matched Java build file");
                    return Ok(Some(recipe));
                }
            }
        }
        Ok(None)
    }
}

impl Detector for JavaDetector {
    fn job_name(&self) -> &'static str {
        "java-build"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Option<Vec<Step>>> {
        let Some(recipe) = Self::matching_recipe(ctx)? else {
            return Ok(None);
        };

        let mut steps = vec![checkout_step()];
        steps.extend(
            recipe
                .steps
                .iter()
                .map(|(name, image, run)| Step::new(*name, *image).with_run(*run)),
        );
        steps.push(scan_step("scan", "JAVA"));
        Ok(Some(steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::test_support::apply_to_base;
    use crate::error::WorkflowError;
    use crate::fs::MockFileSystem;
    use crate::workflow::Workflow;
    use yare::parameterized;

    fn runs(workflow: &Workflow) -> Vec<&str> {
        workflow.jobs["java-build"]
            .steps
            .iter()
            .filter_map(|s| s.run.as_deref())
            .collect()
    }

    #[parameterized(
        maven_wrapper = { &["mvnw", "pom.xml"], &["./mvnw install"] },
        maven = { &["pom.xml"], &["mvn install"] },
        maven_over_gradle = { &["pom.xml", "gradlew"], &["mvn install"] },
        gradle_wrapper = { &["gradlew", "build.gradle"], &["./gradlew build", "./gradlew test"] },
        gradle = { &["build.gradle"], &["gradle build", "gradle test"] },
        gradle_kotlin = { &["build.gradle.kts"], &["gradle build", "gradle test"] },
    )]
    fn test_recipe_selection(files: &[&str], expected: &[&str]) {
        let mut fs = MockFileSystem::new();
        for file in files {
            fs.add_file(file, "");
        }

        let workflow = apply_to_base(&JavaDetector, &fs).unwrap();
        assert_eq!(runs(&workflow), expected);
    }

    #[test]
    fn test_step_layout() {
        let mut fs = MockFileSystem::new();
        fs.add_file("gradlew", "#!/bin/sh");

        let workflow = apply_to_base(&JavaDetector, &fs).unwrap();
        let steps = &workflow.jobs["java-build"].steps;
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0], checkout_step());
        assert_eq!(steps[1].uses, GRADLE_IMAGE);
        assert_eq!(steps[3].with["language"], "JAVA");
    }

    #[test]
    fn test_no_build_file() {
        let mut fs = MockFileSystem::new();
        fs.add_file("src/Main.java", "class Main {}");

        let workflow = apply_to_base(&JavaDetector, &fs).unwrap();
        assert_eq!(workflow, Workflow::base());
    }

    #[test]
    fn test_stat_error_propagates() {
        let mut fs = MockFileSystem::new();
        fs.add_unreadable("pom.xml");
        fs.add_file("build.gradle", "");

        let err = apply_to_base(&JavaDetector, &fs).unwrap_err();
        assert!(matches!(err, WorkflowError::Io { .. }));
    }
}
