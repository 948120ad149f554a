//! End-to-end CLI behavior: rendering, append mode, exit codes.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::Value;

mod util;
use util::{RULES_1_3, RULES_1_4, make_gl_fixture};

fn glextract() -> Command
{
    let mut cmd = Command::cargo_bin("glextract").expect("bin");
    cmd.arg("--no-color");
    cmd
}

fn run_json(
    dir: &std::path::Path,
    extra: &[&str],
) -> Value
{
    let out = glextract()
        .current_dir(dir)
        .args(extra)
        .args(["--json", "rules.txt", "glext.h", "glfunc.inc"])
        .output()
        .expect("run");

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    serde_json::from_slice(&out.stdout).expect("json report")
}

#[test]
fn bare_invocation_prints_usage_and_succeeds()
{
    Command::cargo_bin("glextract")
        .expect("bin")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn fresh_run_renders_constants_then_guarded_blocks()
{
    let tmp = make_gl_fixture(RULES_1_3);

    glextract()
        .current_dir(tmp.path())
        .args(["rules.txt", "glext.h", "glfunc.inc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("9 accepted, 0 skipped"));

    let out = fs::read_to_string(tmp.child("glfunc.inc").path()).unwrap();

    assert_eq!(
        out,
        "\
DEF_GLCONST(GL_UNSIGNED_BYTE_3_3_2, 0x8032)
DEF_GLCONST(GL_TEXTURE_BINDING_3D, 0x806A)
DEF_GLCONST(GL_TEXTURE0, 0x84C0)
DEF_GLCONST(GL_MULTISAMPLE_BIT, 0x20000000)
DEF_GLCONST(GL_BLEND_DST_RGB, 0x80C8)
#ifdef GL_VERSION_1_2
GLDEFINE(glDrawRangeElements,PFNGLDRAWRANGEELEMENTSPROC)
DEF_GLMETHOD(void, 0, glDrawRangeElements, (GLenum)(GLuint)(GLuint)(GLsizei)(GLenum)(const void *), (mode)(start)(end)(count)(type)(indices))
GLDEFINE(glCopyTexSubImage3D,PFNGLCOPYTEXSUBIMAGE3DPROC)
DEF_GLMETHOD(void, 0, glCopyTexSubImage3D, (GLenum)(GLint)(GLint)(GLint)(GLint)(GLint)(GLint)(GLsizei)(GLsizei), (target)(level)(xoffset)(yoffset)(zoffset)(x)(y)(width)(height))
#endif
#ifdef GL_VERSION_1_3
GLDEFINE(glActiveTexture,PFNGLACTIVETEXTUREPROC)
DEF_GLMETHOD(void, 0, glActiveTexture, (GLenum), (texture))
GLDEFINE(glGetCompressedTexImage,PFNGLGETCOMPRESSEDTEXIMAGEPROC)
DEF_GLMETHOD(void, 0, glGetCompressedTexImage, (GLenum)(GLint)(void *), (target)(level)(img))
#endif
"
    );
}

#[test]
fn append_with_superset_rules_adds_only_new_block()
{
    let tmp = make_gl_fixture(RULES_1_3);
    run_json(tmp.path(), &[]);
    let before = fs::read_to_string(tmp.child("glfunc.inc").path()).unwrap();

    tmp.child("rules.txt")
        .write_str(RULES_1_4)
        .unwrap();
    let report = run_json(tmp.path(), &["--append"]);

    assert_eq!(report["functions"]["accepted"], 2);
    assert_eq!(report["functions"]["skipped"], 4);
    assert_eq!(report["constants"]["accepted"], 0);
    assert_eq!(report["constants"]["skipped"], 5);
    assert_eq!(report["regions"], 3);

    let after = fs::read_to_string(tmp.child("glfunc.inc").path()).unwrap();
    let appended = after
        .strip_prefix(&before)
        .expect("prior content preserved");

    assert_eq!(
        appended,
        "\
#ifdef GL_VERSION_1_4
GLDEFINE(glBlendFuncSeparate,PFNGLBLENDFUNCSEPARATEPROC)
DEF_GLMETHOD(void, 0, glBlendFuncSeparate, (GLenum)(GLenum)(GLenum)(GLenum), (sfactorRGB)(dfactorRGB)(sfactorAlpha)(dfactorAlpha))
GLDEFINE(glGetStringi,PFNGLGETSTRINGIPROC)
DEF_GLMETHOD(const GLubyte *, 1, glGetStringi, (GLenum)(GLuint), (name)(index))
#endif
"
    );
}

#[test]
fn repeated_append_accepts_nothing()
{
    let tmp = make_gl_fixture(RULES_1_4);

    let first = run_json(tmp.path(), &["-a"]);
    let snapshot = fs::read_to_string(tmp.child("glfunc.inc").path()).unwrap();
    let second = run_json(tmp.path(), &["-a"]);

    assert_eq!(second["functions"]["accepted"], 0);
    assert_eq!(second["constants"]["accepted"], 0);
    assert_eq!(second["functions"]["skipped"], first["functions"]["accepted"]);
    assert_eq!(second["constants"]["skipped"], first["constants"]["accepted"]);
    assert_eq!(fs::read_to_string(tmp.child("glfunc.inc").path()).unwrap(), snapshot);

    for name in ["glActiveTexture", "glGetStringi"]
    {
        assert_eq!(util::count_named(&snapshot, "GLDEFINE(", name), 1);
    }
    assert_eq!(util::count_named(&snapshot, "DEF_GLCONST(", "GL_TEXTURE0"), 1);
}

#[test]
fn kind_flag_limits_emitted_lines()
{
    let tmp = make_gl_fixture(RULES_1_3);

    glextract()
        .current_dir(tmp.path())
        .args(["-k", "declaration", "rules.txt", "glext.h", "glfunc.inc"])
        .assert()
        .success();

    let out = fs::read_to_string(tmp.child("glfunc.inc").path()).unwrap();

    assert!(out.contains("GLDEFINE(glActiveTexture,PFNGLACTIVETEXTUREPROC)"));
    assert!(!out.contains("DEF_GLMETHOD"));
    assert!(!out.contains("DEF_GLCONST"));
}

#[test]
fn marker_rule_renders_one_guarded_pair()
{
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("rules.txt")
        .write_str("MYGUARD\n^BEGIN$\n^END$\n")
        .unwrap();
    tmp.child("glext.h")
        .write_str("BEGIN\nGLAPI void APIENTRY glFoo(GLint a, GLfloat *b);\nEND\n")
        .unwrap();

    glextract()
        .current_dir(tmp.path())
        .args(["--quiet", "--kind", "declaration,method", "rules.txt", "glext.h", "glfunc.inc"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let out = fs::read_to_string(tmp.child("glfunc.inc").path()).unwrap();

    insta::assert_snapshot!(out, @r"
    #ifdef MYGUARD
    GLDEFINE(glFoo,PFNGLFOOPROC)
    DEF_GLMETHOD(void, 0, glFoo, (GLint)(GLfloat *), (a)(b))
    #endif
    ");
}

#[test]
fn unterminated_region_is_fatal()
{
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("rules.txt")
        .write_str("MYGUARD\n^BEGIN$\n^END$\n")
        .unwrap();
    tmp.child("glext.h")
        .write_str("BEGIN\nGLAPI void APIENTRY glFoo (void);\n")
        .unwrap();

    glextract()
        .current_dir(tmp.path())
        .args(["rules.txt", "glext.h", "glfunc.inc"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("glextract::unterminated_region"));

    let out = fs::read_to_string(tmp.child("glfunc.inc").path()).unwrap();
    assert!(!out.contains("glFoo"));
}

#[test]
fn missing_output_path_exits_with_one()
{
    let tmp = make_gl_fixture(RULES_1_3);

    glextract()
        .current_dir(tmp.path())
        .args(["rules.txt", "glext.h"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("glextract::missing_path"));
}

#[test]
fn unknown_option_exits_with_one()
{
    let tmp = make_gl_fixture(RULES_1_3);

    glextract()
        .current_dir(tmp.path())
        .args(["--frobnicate", "rules.txt", "glext.h", "glfunc.inc"])
        .assert()
        .code(1);

    tmp.child("glfunc.inc")
        .assert(predicate::path::missing());
}

#[test]
fn missing_input_exits_with_one()
{
    let tmp = make_gl_fixture(RULES_1_3);

    glextract()
        .current_dir(tmp.path())
        .args(["rules.txt", "absent.h", "glfunc.inc"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("glextract::open_input"));
}

#[test]
fn oversized_input_is_rejected_before_output_opens()
{
    let tmp = make_gl_fixture(RULES_1_3);

    glextract()
        .current_dir(tmp.path())
        .args(["--max-input-bytes", "16", "rules.txt", "glext.h", "glfunc.inc"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("glextract::input_too_large"));

    tmp.child("glfunc.inc")
        .assert(predicate::path::missing());
}

#[test]
fn dry_run_reports_without_writing()
{
    let tmp = make_gl_fixture(RULES_1_3);

    glextract()
        .current_dir(tmp.path())
        .args(["--dry-run", "rules.txt", "glext.h", "glfunc.inc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY RUN"));

    tmp.child("glfunc.inc")
        .assert(predicate::path::missing());
}

#[test]
fn config_file_sets_default_kinds()
{
    let tmp = make_gl_fixture(RULES_1_3);
    tmp.child("glextract.toml")
        .write_str("kinds = [\"constant\"]\n")
        .unwrap();

    glextract()
        .current_dir(tmp.path())
        .args(["rules.txt", "glext.h", "glfunc.inc"])
        .assert()
        .success();

    let out = fs::read_to_string(tmp.child("glfunc.inc").path()).unwrap();
    assert_eq!(out.lines().count(), 5);
    assert!(
        out.lines()
            .all(|l| l.starts_with("DEF_GLCONST("))
    );
}

#[test]
fn init_writes_config_once()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    glextract()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success();

    tmp.child("glextract.toml")
        .assert(predicate::str::contains("max_input_bytes"));

    glextract()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn completions_print_to_stdout()
{
    glextract()
        .args(["completions", "bash", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("glextract"));
}
