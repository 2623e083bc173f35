use anyhow::Result;

use crate::{CliTest, stderr, stdout};

const DICTIONARY: &str = r#"{
  "common": { "save": "保存", "title": "标题" },
  "msg": { "saveSuccess": "保存成功" }
}"#;

const APP_VUE: &str = r#"<template>
  <div>
    <h1>标题</h1>
    <button @click="save">保存</button>
  </div>
</template>

<script>
export default {
  methods: {
    save() {
      this.$message.success('保存成功');
      console.log('调试信息');
    },
  },
};
</script>
"#;

const APP_VUE_CONVERTED: &str = r#"<template>
  <div>
    <h1>{{ $t('common.title') }}</h1>
    <button @click="save">{{ $t('common.save') }}</button>
  </div>
</template>

<script>
export default {
  methods: {
    save() {
      this.$message.success(i18n.t('msg.saveSuccess'));
      console.log('调试信息');
    },
  },
};
</script>
"#;

fn setup_project(test: &CliTest) -> Result<()> {
    test.write_file("src/locales/zh-CN.json", DICTIONARY)?;
    test.write_file("src/App.vue", APP_VUE)?;
    test.write_file("src/utils/tip.js", "export const tip = '新提示';\n")?;
    Ok(())
}

#[test]
fn test_convert_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::new()?;
    setup_project(&test)?;

    let output = test.convert_command().output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("would convert src/App.vue"), "stdout: {}", out);
    assert!(out.contains("would convert src/utils/tip.js"), "stdout: {}", out);
    assert!(out.contains("1 text(s) without a dictionary key"), "stdout: {}", out);
    assert!(out.contains("Would convert 2 of 2 files."), "stdout: {}", out);
    assert!(!out.contains("zh-CN.json"), "dictionary must not be converted: {}", out);

    assert_eq!(test.read_file("src/App.vue")?, APP_VUE);
    assert!(!test.root().join("i18n-unmatched.log").exists());
    Ok(())
}

#[test]
fn test_convert_apply_rewrites_files_and_logs_unmatched() -> Result<()> {
    let test = CliTest::new()?;
    setup_project(&test)?;

    let output = test.convert_command().arg("--apply").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("converted src/App.vue"), "stdout: {}", out);
    assert!(out.contains("Converted 2 of 2 files."), "stdout: {}", out);
    assert!(out.contains("Unmatched text (1) appended to i18n-unmatched.log."), "stdout: {}", out);

    assert_eq!(test.read_file("src/App.vue")?, APP_VUE_CONVERTED);
    assert_eq!(test.read_file("src/utils/tip.js")?, "export const tip = i18n.t('新提示');\n");
    assert_eq!(test.read_file("src/locales/zh-CN.json")?, DICTIONARY);

    let log = test.read_file("i18n-unmatched.log")?;
    assert!(log.contains("unmatched: 1"), "log: {}", log);
    assert!(log.contains("\"新提示\""), "log: {}", log);
    Ok(())
}

#[test]
fn test_convert_twice_changes_nothing() -> Result<()> {
    let test = CliTest::new()?;
    setup_project(&test)?;

    test.convert_command().arg("--apply").output()?;
    let first = test.read_file("src/App.vue")?;

    let output = test.convert_command().arg("--apply").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(
        stdout(&output).contains("Checked 2 files - nothing to convert"),
        "stdout: {}",
        stdout(&output)
    );
    assert_eq!(test.read_file("src/App.vue")?, first);
    Ok(())
}

#[test]
fn test_convert_skip_unmatched() -> Result<()> {
    let test = CliTest::new()?;
    setup_project(&test)?;

    let output = test
        .convert_command()
        .args(["--apply", "--skip-unmatched"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(test.read_file("src/utils/tip.js")?, "export const tip = '新提示';\n");
    assert_eq!(test.read_file("src/App.vue")?, APP_VUE_CONVERTED);
    assert!(test.read_file("i18n-unmatched.log")?.contains("\"新提示\""));
    Ok(())
}

#[test]
fn test_convert_flag_turns_off_config_skip() -> Result<()> {
    let test = CliTest::new()?;
    setup_project(&test)?;
    test.write_file(".i18nrc.json", r#"{ "skipUnmatched": true }"#)?;

    let output = test
        .convert_command()
        .args(["--apply", "--no-skip-unmatched"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(test.read_file("src/utils/tip.js")?, "export const tip = i18n.t('新提示');\n");
    Ok(())
}

#[test]
fn test_convert_explicit_path_and_js_dictionary() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "lang/zh.js",
        "export default {\n  order: { submit: '提交' },\n  pda: { submit: '提交' },\n};\n",
    )?;
    test.write_file("src/a.js", "const label = '提交';\n")?;
    test.write_file("src/b.js", "const label = '提交';\n")?;

    let output = test
        .convert_command()
        .args(["src/b.js", "--dict", "lang/zh.js", "--match-path", "pda", "--apply"])
        .output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(test.read_file("src/a.js")?, "const label = '提交';\n");
    assert_eq!(test.read_file("src/b.js")?, "const label = i18n.t('pda.submit');\n");
    Ok(())
}

#[test]
fn test_convert_uses_config_file() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".i18nrc.json",
        r#"{
  "dictionary": "./i18n/zh.json",
  "includes": ["app"],
  "templateCallee": "t",
  "scriptCallee": "this.$t",
  "logFile": "logs/missing.log"
}"#,
    )?;
    test.write_file("i18n/zh.json", r#"{ "common": { "save": "保存" } }"#)?;
    test.write_file("logs/.keep", "")?;
    test.write_file(
        "app/Page.vue",
        "<template><p>保存</p></template>\n<script>\nconst a = '保存';\nconst b = '未收录';\n</script>\n",
    )?;

    let output = test.convert_command().arg("--apply").output()?;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    assert_eq!(
        test.read_file("app/Page.vue")?,
        "<template><p>{{ t('common.save') }}</p></template>\n<script>\nconst a = this.$t('common.save');\nconst b = this.$t('未收录');\n</script>\n"
    );
    assert!(test.read_file("logs/missing.log")?.contains("\"未收录\""));
    Ok(())
}

#[test]
fn test_convert_reports_parse_failures() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("src/locales/zh-CN.json", DICTIONARY)?;
    test.write_file("src/broken.js", "const a = '保存';\nconst = ;\n")?;
    test.write_file("src/ok.js", "const a = '保存';\n")?;

    let output = test.convert_command().arg("--apply").output()?;
    assert_eq!(output.status.code(), Some(1));

    let out = stdout(&output);
    assert!(out.contains("--> src/broken.js:2"), "stdout: {}", out);
    assert!(out.contains("1 file could not be converted."), "stdout: {}", out);

    assert_eq!(test.read_file("src/broken.js")?, "const a = '保存';\nconst = ;\n");
    assert_eq!(test.read_file("src/ok.js")?, "const a = i18n.t('common.save');\n");
    Ok(())
}

#[test]
fn test_convert_missing_dictionary_warns() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("src/a.js", "const a = '保存';\n")?;

    let output = test.convert_command().output()?;
    assert!(output.status.success());
    assert!(
        stderr(&output).contains("continuing with an empty dictionary"),
        "stderr: {}",
        stderr(&output)
    );
    assert!(stdout(&output).contains("would convert src/a.js"));
    Ok(())
}

#[test]
fn test_convert_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".i18nrc.json", r#"{ "scriptCallee": "not valid" }"#)?;

    let output = test.convert_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("scriptCallee"), "stderr: {}", stderr(&output));
    Ok(())
}
