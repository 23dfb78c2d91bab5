// tests/tutti_bundle.rs

mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use assetwatch::fs::RealFileSystem;
use assetwatch::fs::mock::MockFileSystem;
use assetwatch::livereload::NoopNotifier;
use assetwatch::mode::BuildMode;
use assetwatch::pipeline::{PipelineTask, TaskEnv};
use assetwatch_test_utils::transforms::FakeTool;
use proptest::prelude::*;

use common::{mock_env, tutti_task};

const BUNDLE: &str = "./webstatic/assets/js/tutti.min.js";

fn fs_with(files: &[(&String, &String)]) -> MockFileSystem {
    let fs = MockFileSystem::new();
    for (name, contents) in files {
        fs.add_file(format!("./websrc/scripts/tutti/{name}.js"), contents.as_str());
    }
    fs
}

fn bundle(fs: &MockFileSystem) -> Option<String> {
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let task = tutti_task(mock_env(fs), BuildMode::development(), FakeTool::new("uglify").arc());
    rt.block_on(task.run()).unwrap();
    fs.contents(BUNDLE)
}

proptest! {
    #[test]
    fn bundle_is_sorted_concatenation_regardless_of_creation_order(
        files in proptest::collection::btree_map("[a-z]{1,8}", "[a-z ;=]{0,24}", 1..8)
    ) {
        let forward: Vec<_> = files.iter().collect();
        let backward: Vec<_> = files.iter().rev().collect();

        let mut names: Vec<String> = files.keys().map(|n| format!("{n}.js")).collect();
        names.sort();
        let by_file: BTreeMap<String, &String> =
            files.iter().map(|(n, c)| (format!("{n}.js"), c)).collect();
        let expected = names
            .iter()
            .map(|n| by_file[n].as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let a = bundle(&fs_with(&forward));
        let b = bundle(&fs_with(&backward));
        prop_assert_eq!(a.as_deref(), Some(expected.as_str()));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn rebuilding_unchanged_inputs_is_idempotent(
        files in proptest::collection::btree_map("[a-z]{1,8}", "[a-z ;=]{0,24}", 1..8)
    ) {
        let fs = fs_with(&files.iter().collect::<Vec<_>>());
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let task = tutti_task(mock_env(&fs), BuildMode::development(), FakeTool::new("uglify").arc());

        let first = rt.block_on(task.run()).unwrap();
        let after_first = fs.contents(BUNDLE);
        let second = rt.block_on(task.run()).unwrap();

        prop_assert_eq!(&first.written, &second.written);
        prop_assert_eq!(second.written.len(), 1);
        prop_assert!(after_first.is_some());
        prop_assert_eq!(fs.contents(BUNDLE), after_first);
    }
}

#[tokio::test]
async fn no_inputs_means_no_bundle() {
    let fs = MockFileSystem::new();
    let task = tutti_task(mock_env(&fs), BuildMode::production(), FakeTool::new("uglify").arc());

    let report = task.run().await.unwrap();

    assert!(report.written.is_empty());
    assert!(fs.contents(BUNDLE).is_none());
}

#[tokio::test]
async fn production_minifies_and_maps_every_part() {
    let fs = MockFileSystem::new();
    fs.add_file("./websrc/scripts/tutti/b.js", "var b = 2;");
    fs.add_file("./websrc/scripts/tutti/a.js", "var a = 1;\nvar aa = 11;");
    let minifier = FakeTool::new("uglify");

    let task = tutti_task(mock_env(&fs), BuildMode::production(), minifier.arc());
    let report = task.run().await.unwrap();

    assert_eq!(report.written.len(), 2);
    assert_eq!(minifier.calls().len(), 1);

    let js = fs.contents(BUNDLE).unwrap();
    assert!(js.starts_with("VAR A = 1;\nVAR AA = 11;\nVAR B = 2;"));
    assert!(js.ends_with("//# sourceMappingURL=tutti.min.js.map\n"));

    let map: serde_json::Value =
        serde_json::from_str(&fs.contents(format!("{BUNDLE}.map")).unwrap()).unwrap();
    assert_eq!(map["file"], "tutti.min.js");
    assert_eq!(map["sources"][0], "websrc/scripts/tutti/a.js");
    assert_eq!(map["sources"][1], "websrc/scripts/tutti/b.js");
}

#[tokio::test]
async fn scripts_outside_the_tutti_directory_are_not_bundled() {
    let fs = MockFileSystem::new();
    fs.add_file("./websrc/scripts/app.js", "app");
    fs.add_file("./websrc/scripts/tutti/nav.js", "nav");

    let task = tutti_task(mock_env(&fs), BuildMode::development(), FakeTool::new("uglify").arc());
    task.run().await.unwrap();

    assert_eq!(fs.contents(BUNDLE).as_deref(), Some("nav"));
}

#[tokio::test]
async fn deleted_bundle_is_rebuilt_on_the_next_run() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    std::fs::create_dir_all(root.join("websrc/scripts/tutti")).unwrap();
    std::fs::write(root.join("websrc/scripts/tutti/a.js"), "var a = 1;").unwrap();

    let env = TaskEnv::new(root, Arc::new(RealFileSystem), Arc::new(NoopNotifier));
    let task = tutti_task(env, BuildMode::development(), FakeTool::passthrough("uglify").arc());
    let bundle = root.join("webstatic/assets/js/tutti.min.js");

    task.run().await.unwrap();
    assert_eq!(std::fs::read_to_string(&bundle).unwrap(), "var a = 1;");

    std::fs::remove_file(&bundle).unwrap();
    let report = task.run().await.unwrap();

    assert_eq!(report.written, vec![bundle.clone()]);
    assert_eq!(report.unchanged, 0);
    assert_eq!(std::fs::read_to_string(&bundle).unwrap(), "var a = 1;");
}
