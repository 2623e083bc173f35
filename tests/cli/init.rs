use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .i18nrc.json

    ----- stderr -----
    ");

    let content = test.read_file(".i18nrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    for field in ["dictionary", "matchPath", "templateCallee", "scriptCallee", "logFile"] {
        assert!(parsed.get(field).is_some(), "Config should have '{}' field", field);
    }
    assert_eq!(parsed["templateCallee"], "$t");

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".i18nrc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: false
    exit_code: 1
    ----- stdout -----

    ----- stderr -----
    ✘ .i18nrc.json already exists
    ");

    assert_eq!(test.read_file(".i18nrc.json")?, "{}");
    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;

    test.write_file("src/locales/zh-CN.json", r#"{ "common": { "ok": "确定" } }"#)?;
    test.write_file("src/App.vue", "<template>\n  <button>确定</button>\n</template>\n")?;

    let output = test.convert_command().arg("--apply").output()?;
    assert!(
        output.status.success(),
        "convert should work with the initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(test.root().join("src/App.vue").exists());
    assert_eq!(
        test.read_file("src/App.vue")?,
        "<template>\n  <button>{{ $t('common.ok') }}</button>\n</template>\n"
    );

    Ok(())
}
