//! End-to-end reconciliation scenarios against a real sandboxed filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use converge_core::{
    DesiredState, Error, ErrorKind, FileParams, InvocationOptions, Outcome, Reconciler,
};
use converge_fs::ModeSpec;
use converge_test_utils::TestTree;
use pretty_assertions::assert_eq;

fn params(tree: &TestTree, rel: &str, state: DesiredState) -> FileParams {
    FileParams {
        path: Some(tree.path_str(rel)),
        state,
        ..Default::default()
    }
}

fn link_params(tree: &TestTree, rel: &str, src: impl AsRef<Path>, force: bool) -> FileParams {
    FileParams {
        src: Some(src.as_ref().to_string_lossy().into_owned()),
        force,
        ..params(tree, rel, DesiredState::Link)
    }
}

fn apply(params: &FileParams) -> converge_core::Result<Outcome> {
    Reconciler::system(InvocationOptions::default()).run(params)
}

// ============================================================================
// Absent
// ============================================================================

#[test]
fn absent_path_stays_absent_without_change() {
    let tree = TestTree::new();

    let outcome = apply(&params(&tree, "f", DesiredState::Absent)).unwrap();

    assert!(!outcome.changed);
    assert_eq!(outcome.path, tree.path("f"));
}

#[test]
fn absent_removes_file_then_is_idempotent() {
    let tree = TestTree::new();
    tree.file("f", "data");
    let p = params(&tree, "f", DesiredState::Absent);

    assert!(apply(&p).unwrap().changed);
    tree.assert_absent("f");
    assert!(!apply(&p).unwrap().changed);
}

#[test]
fn absent_removes_directory_tree() {
    let tree = TestTree::new();
    tree.file("d/a/b/c.txt", "deep");
    tree.symlink("d/link", "/etc/hosts");

    let outcome = apply(&params(&tree, "d", DesiredState::Absent)).unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.msg, None);
    tree.assert_absent("d");
}

#[test]
fn partial_tree_removal_is_a_soft_failure() {
    if nix::unistd::geteuid().is_root() {
        return;
    }
    let tree = TestTree::new();
    tree.file("d/locked/pinned", "p");
    tree.chmod("d/locked", 0o500);

    let outcome = apply(&params(&tree, "d", DesiredState::Absent));
    tree.chmod("d/locked", 0o700);

    let outcome = outcome.unwrap();
    assert!(outcome.changed);
    let msg = outcome.msg.expect("soft failure message");
    assert!(msg.starts_with("rmtree failed: "), "unexpected msg: {}", msg);
    tree.assert_file("d/locked/pinned", "p");
}

#[test]
fn absent_on_symlink_to_directory_only_unlinks() {
    let tree = TestTree::new();
    let target = tree.dir("real");
    tree.file("real/keep.txt", "keep");
    tree.symlink("alias", &target);

    assert!(apply(&params(&tree, "alias", DesiredState::Absent)).unwrap().changed);

    tree.assert_absent("alias");
    tree.assert_file("real/keep.txt", "keep");
}

#[test]
fn absent_removes_dangling_symlink() {
    let tree = TestTree::new();
    tree.symlink("dangling", tree.path("gone"));

    assert!(apply(&params(&tree, "dangling", DesiredState::Absent)).unwrap().changed);
    tree.assert_absent("dangling");
}

// ============================================================================
// File
// ============================================================================

#[test]
fn file_state_never_creates_content() {
    let tree = TestTree::new();

    let err = apply(&params(&tree, "missing", DesiredState::File)).unwrap_err();

    assert!(matches!(err, Error::MissingContent { .. }));
    assert_eq!(err.kind(), ErrorKind::MissingContent);
    tree.assert_absent("missing");
}

#[test]
fn file_state_converges_mode_once() {
    let tree = TestTree::new();
    tree.file("conf", "x");
    tree.chmod("conf", 0o644);
    let mut p = params(&tree, "conf", DesiredState::File);
    p.args.mode = Some(ModeSpec::Octal("0600".into()));

    assert!(apply(&p).unwrap().changed);
    assert_eq!(tree.mode("conf"), 0o600);
    assert!(!apply(&p).unwrap().changed);
}

#[test]
fn file_state_without_attributes_is_unchanged() {
    let tree = TestTree::new();
    tree.file("conf", "x");

    assert!(!apply(&params(&tree, "conf", DesiredState::File)).unwrap().changed);
    tree.assert_file("conf", "x");
}

#[test]
fn directory_destination_with_src_targets_inner_file() {
    let tree = TestTree::new();
    tree.dir("www");
    tree.file("www/index.html", "<html>");
    tree.chmod("www/index.html", 0o600);
    let mut p = params(&tree, "www", DesiredState::File);
    p.src = Some("/build/output/index.html".into());
    p.args.mode = Some(ModeSpec::Octal("0644".into()));

    let outcome = apply(&p).unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.path, tree.path("www/index.html"));
    assert_eq!(tree.mode("www/index.html"), 0o644);
}

// ============================================================================
// Directory
// ============================================================================

#[test]
fn directory_created_then_unchanged() {
    let tree = TestTree::new();
    let p = params(&tree, "d", DesiredState::Directory);

    assert!(apply(&p).unwrap().changed);
    tree.assert_dir("d");
    assert!(!apply(&p).unwrap().changed);
}

#[test]
fn directory_creates_missing_parents() {
    let tree = TestTree::new();

    assert!(apply(&params(&tree, "a/b/c", DesiredState::Directory)).unwrap().changed);
    tree.assert_dir("a/b/c");
}

#[test]
fn directory_through_file_parent_fails_with_os_error() {
    let tree = TestTree::new();
    tree.file("blocker", "x");

    let err = apply(&params(&tree, "blocker/child", DesiredState::Directory)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Os);
    assert_eq!(err.path(), Some(tree.path("blocker/child").as_path()));
    tree.assert_file("blocker", "x");
}

#[test]
fn recursive_mode_reaches_every_descendant() {
    let tree = TestTree::new();
    tree.file("site/index.html", "i");
    tree.file("site/assets/app.js", "a");
    tree.file("site/assets/img/logo.png", "l");
    for rel in ["site", "site/assets", "site/assets/img"] {
        tree.chmod(rel, 0o700);
    }
    let mut p = params(&tree, "site", DesiredState::Directory);
    p.recurse = true;
    p.args.mode = Some(ModeSpec::Octal("0755".into()));

    assert!(apply(&p).unwrap().changed);
    for rel in [
        "site",
        "site/index.html",
        "site/assets",
        "site/assets/app.js",
        "site/assets/img",
        "site/assets/img/logo.png",
    ] {
        assert_eq!(tree.mode(rel), 0o755, "{} not converged", rel);
    }
    assert!(!apply(&p).unwrap().changed);
}

#[test]
fn recursion_does_not_follow_symlinked_directories() {
    let tree = TestTree::new();
    tree.file("outside/secret", "s");
    tree.chmod("outside/secret", 0o600);
    tree.dir("site");
    tree.symlink("site/escape", tree.path("outside"));
    let mut p = params(&tree, "site", DesiredState::Directory);
    p.recurse = true;
    p.args.mode = Some(ModeSpec::Octal("0755".into()));

    apply(&p).unwrap();

    assert_eq!(tree.mode("outside/secret"), 0o600);
}

#[test]
fn recursion_never_chmods_through_symlinked_files() {
    let tree = TestTree::new();
    let outside = tree.file("outside_secret", "s");
    tree.chmod("outside_secret", 0o600);
    tree.file("site/index.html", "i");
    tree.symlink("site/escape", &outside);
    let mut p = params(&tree, "site", DesiredState::Directory);
    p.recurse = true;
    p.args.mode = Some(ModeSpec::Octal("0755".into()));

    assert!(apply(&p).unwrap().changed);

    assert_eq!(tree.mode("outside_secret"), 0o600);
    assert_eq!(tree.mode("site/index.html"), 0o755);
    tree.assert_symlink("site/escape", &outside);
    assert!(!apply(&p).unwrap().changed);
}

// ============================================================================
// Symbolic links
// ============================================================================

#[test]
fn link_to_etc_hosts() {
    if !Path::new("/etc/hosts").exists() {
        return;
    }
    let tree = TestTree::new();

    let outcome = apply(&link_params(&tree, "link", "/etc/hosts", false)).unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.src, Some(PathBuf::from("/etc/hosts")));
    tree.assert_symlink("link", "/etc/hosts");
}

#[test]
fn link_created_then_unchanged() {
    let tree = TestTree::new();
    let src = tree.file("target", "t");
    let p = link_params(&tree, "link", &src, false);

    assert!(apply(&p).unwrap().changed);
    tree.assert_symlink("link", &src);
    assert!(!apply(&p).unwrap().changed);
}

#[test]
fn link_is_repointed_to_new_source() {
    let tree = TestTree::new();
    let a = tree.file("a", "a");
    let b = tree.file("b", "b");
    tree.symlink("link", &a);

    let outcome = apply(&link_params(&tree, "link", &b, false)).unwrap();

    assert!(outcome.changed);
    tree.assert_symlink("link", &b);
}

#[test]
fn relative_recorded_target_is_resolved_before_comparing() {
    let tree = TestTree::new();
    let target = tree.file("releases/v2/app", "v2");
    tree.symlink("current", "releases/v2/app");

    let outcome = apply(&link_params(&tree, "current", &target, false)).unwrap();

    assert!(!outcome.changed);
    tree.assert_symlink("current", "releases/v2/app");
}

#[test]
fn link_over_file_requires_force() {
    let tree = TestTree::new();
    let src = tree.file("src", "s");
    tree.file("existing", "precious");

    let err = apply(&link_params(&tree, "existing", &src, false)).unwrap_err();

    assert!(matches!(err, Error::DestinationOccupied { .. }));
    assert_eq!(err.kind(), ErrorKind::IllegalTransition);
    tree.assert_file("existing", "precious");
}

#[test]
fn forced_link_replaces_file() {
    let tree = TestTree::new();
    let src = tree.file("src", "s");
    tree.file("existing", "old");

    let outcome = apply(&link_params(&tree, "existing", &src, true)).unwrap();

    assert!(outcome.changed);
    tree.assert_symlink("existing", &src);
}

#[test]
fn missing_source_is_fatal_without_force() {
    let tree = TestTree::new();

    let err = apply(&link_params(&tree, "link", tree.path("nope"), false)).unwrap_err();

    assert!(matches!(err, Error::SourceMissing { .. }));
    tree.assert_absent("link");
}

#[test]
fn forced_link_to_missing_source_is_dangling() {
    let tree = TestTree::new();
    let src = tree.path("staged-later");

    assert!(apply(&link_params(&tree, "link", &src, true)).unwrap().changed);
    tree.assert_symlink("link", &src);
}

#[test]
fn relative_source_is_a_configuration_error() {
    let tree = TestTree::new();

    let err = apply(&link_params(&tree, "link", "etc/hosts", true)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    tree.assert_absent("link");
}

#[test]
fn link_without_source_is_a_configuration_error() {
    let tree = TestTree::new();

    let err = apply(&params(&tree, "link", DesiredState::Link)).unwrap_err();

    assert!(matches!(err, Error::MissingLinkSource { .. }));
}

// ============================================================================
// Hard links
// ============================================================================

#[test]
fn hard_link_created_then_unchanged() {
    let tree = TestTree::new();
    let src = tree.file("data", "d");
    let p = FileParams {
        src: Some(src.to_string_lossy().into_owned()),
        ..params(&tree, "copy", DesiredState::Hard)
    };

    let outcome = apply(&p).unwrap();
    assert!(outcome.changed);
    assert_eq!(tree.inode("copy"), tree.inode("data"));

    assert!(!apply(&p).unwrap().changed);
}

#[test]
fn hard_link_over_unrelated_file_is_refused_even_with_force() {
    let tree = TestTree::new();
    let src = tree.file("data", "d");
    tree.file("other", "o");
    let p = FileParams {
        src: Some(src.to_string_lossy().into_owned()),
        force: true,
        ..params(&tree, "other", DesiredState::Hard)
    };

    let err = apply(&p).unwrap_err();

    assert!(matches!(err, Error::IllegalTransition { .. }));
    tree.assert_file("other", "o");
}

// ============================================================================
// Peek
// ============================================================================

#[test]
fn peek_reports_binary_without_changing() {
    let tree = TestTree::new();
    let path = tree.path("blob");
    fs::write(&path, b"\x7fELF\x00\x00").unwrap();
    let before = tree.snapshot();
    let p = FileParams {
        peek: true,
        ..params(&tree, "blob", DesiredState::Absent)
    };

    let outcome = apply(&p).unwrap();

    assert!(!outcome.changed);
    assert_eq!(outcome.appears_binary, Some(true));
    assert_eq!(before, tree.snapshot());
}
