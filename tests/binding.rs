/*
 * Licensed to the Apache Software Foundation (ASF) under one
 * or more contributor license agreements.  See the NOTICE file
 * distributed with this work for additional information
 * regarding copyright ownership.  The ASF licenses this file
 * to you under the Apache License, Version 2.0 (the
 * "License"); you may not use this file except in compliance
 * with the License.  You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing,
 * software distributed under the License is distributed on an
 * "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
 * KIND, either express or implied.  See the License for the
 * specific language governing permissions and limitations
 * under the License.
 */

use nacos_config_binder::{
    BindError, ConfigType, ConversionError, Environment, ExtConfig, MapPropertySource, NacosConfigProperties,
    SystemEnvironmentPropertySource, build_nacos_config_properties, load_for_bootstrap,
};
use serial_test::serial;
use std::env;
use std::io::Write;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn environment(entries: &[(&str, &str)]) -> Environment {
    let mut source = MapPropertySource::new("application");
    source.extend(entries.iter().copied());
    Environment::new().with_source(source)
}

#[test]
fn binds_every_supported_field_kind() {
    init_tracing();
    let properties = build_nacos_config_properties(&environment(&[
        ("nacos.config.server-addr", " 127.0.0.1:8848 "),
        ("nacos.config.namespace", "dev"),
        ("nacos.config.data-id", "app.properties"),
        ("nacos.config.data-ids", "a.yaml,b.yaml"),
        ("nacos.config.type", "YAML"),
        ("nacos.config.auto-refresh", "true"),
        ("nacos.config.enable-remote-sync-config", "yes"),
        ("nacos.config.max-retry", "3"),
        ("nacos.config.config-long-poll-timeout", "30000"),
        ("nacos.config.password", "nacos"),
    ]))
    .expect("build failed");

    assert_eq!(
        properties,
        NacosConfigProperties {
            server_addr: "127.0.0.1:8848".to_string(),
            namespace: "dev".to_string(),
            data_id: "app.properties".to_string(),
            data_ids: vec!["a.yaml".to_string(), "b.yaml".to_string()],
            r#type: ConfigType::Yaml,
            auto_refresh: true,
            enable_remote_sync_config: true,
            max_retry: Some(3),
            config_long_poll_timeout: Some(30000),
            password: "nacos".to_string(),
            ..Default::default()
        }
    );
}

#[test]
fn ignores_keys_outside_prefix_and_unknown_fields() {
    let properties = build_nacos_config_properties(&environment(&[
        ("nacos.discovery.server-addr", "10.0.0.1:8848"),
        ("spring.application.name", "demo"),
        ("nacos.config.unknown-field", "x"),
        ("nacos.config.bootstrap.enable", "true"),
        ("nacos.config.bootstrap.log-enable", "true"),
    ]))
    .expect("build failed");

    assert_eq!(properties, NacosConfigProperties::default());
}

#[test]
fn invalid_boolean_fails_with_key() {
    let error = build_nacos_config_properties(&environment(&[
        ("nacos.config.server-addr", "127.0.0.1:8848"),
        ("nacos.config.auto-refresh", "notabool"),
    ]))
    .expect_err("build should fail");

    match error {
        BindError::Conversion { key, source } => {
            assert_eq!(key, "autoRefresh");
            assert_eq!(
                source,
                ConversionError::InvalidBoolean {
                    value: "notabool".to_string()
                }
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unknown_config_type_fails_with_key() {
    let error = build_nacos_config_properties(&environment(&[("nacos.config.type", "ini")]))
        .expect_err("build should fail");

    assert_eq!(error.key(), Some("type"));
    assert!(matches!(
        error,
        BindError::Conversion {
            source: ConversionError::UnknownVariant { .. },
            ..
        }
    ));
}

#[test]
fn ext_config_elements_are_auto_created() {
    let properties = build_nacos_config_properties(&environment(&[
        ("nacos.config.ext-config[1].data-id", "db.yaml"),
        ("nacos.config.ext-config[1].type", "yaml"),
        ("nacos.config.ext-config[1].auto-refresh", "true"),
    ]))
    .expect("build failed");

    assert_eq!(properties.ext_config.len(), 2);
    assert_eq!(properties.ext_config[0], ExtConfig::default());
    let ext = &properties.ext_config[1];
    assert_eq!(ext.data_id, "db.yaml");
    assert_eq!(ext.group, "DEFAULT_GROUP");
    assert_eq!(ext.r#type, ConfigType::Yaml);
    assert!(ext.auto_refresh);
}

#[test]
fn oversized_ext_config_index_is_ignored() {
    init_tracing();
    let properties = build_nacos_config_properties(&environment(&[
        ("nacos.config.ext-config[18446744073709551615].data-id", "x"),
        ("nacos.config.ext-config[0].data-id", "db.yaml"),
    ]))
    .expect("build failed");

    assert_eq!(properties.ext_config.len(), 1);
    assert_eq!(properties.ext_config[0].data_id, "db.yaml");
}

#[test]
fn bracketed_string_values_bind_verbatim() {
    let properties = build_nacos_config_properties(&environment(&[
        ("nacos.config.endpoint", "[::1]"),
        ("nacos.config.data-ids", "[a.yaml, \"b.yaml\"]"),
    ]))
    .expect("build failed");

    assert_eq!(properties.endpoint, "[::1]");
    assert_eq!(properties.data_ids, vec!["a.yaml".to_string(), "b.yaml".to_string()]);
}

#[test]
fn scalar_parent_key_does_not_hide_nested_properties() {
    init_tracing();
    let properties = build_nacos_config_properties(&environment(&[
        ("nacos.config", "x"),
        ("nacos.config.server-addr", "127.0.0.1:8848"),
    ]))
    .expect("build failed");

    assert_eq!(properties.server_addr, "127.0.0.1:8848");
}

#[test]
fn ext_config_element_failure_names_element() {
    let error = build_nacos_config_properties(&environment(&[(
        "nacos.config.ext-config[0].type",
        "ini",
    )]))
    .expect_err("build should fail");

    match error {
        BindError::Conversion {
            key,
            source: ConversionError::InElement { index, key: field, .. },
        } => {
            assert_eq!(key, "extConfig");
            assert_eq!(index, 0);
            assert_eq!(field, "type");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn first_source_wins() {
    let environment = Environment::new()
        .with_source(MapPropertySource::new("override").with_property("nacos.config.group", "OVERRIDE"))
        .with_source(
            MapPropertySource::new("defaults")
                .with_property("nacos.config.group", "DEFAULT")
                .with_property("nacos.config.namespace", "public"),
        );

    let properties = build_nacos_config_properties(&environment).expect("build failed");
    assert_eq!(properties.group, "OVERRIDE");
    assert_eq!(properties.namespace, "public");
}

#[test]
fn binds_from_toml_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
[nacos.config]
server-addr = "127.0.0.1:8848"
data-ids = ["app.yaml", "db.yaml"]
auto-refresh = true
max-retry = 5

[[nacos.config.ext-config]]
data-id = "redis.yaml"
group = "CACHE"
"#
    )
    .expect("write");

    let path = file.path().to_str().expect("utf-8 path");
    let source = nacos_config_binder::toml_file_source(path).expect("file should exist");
    let properties =
        build_nacos_config_properties(&Environment::new().with_source(source)).expect("build");

    assert_eq!(properties.server_addr, "127.0.0.1:8848");
    assert_eq!(properties.data_ids, vec!["app.yaml", "db.yaml"]);
    assert!(properties.auto_refresh);
    assert_eq!(properties.max_retry, Some(5));
    assert_eq!(properties.ext_config.len(), 1);
    assert_eq!(properties.ext_config[0].group, "CACHE");
}

#[test]
#[serial]
fn binds_from_environment_variables() {
    unsafe {
        env::set_var("NACOS_CONFIG_SERVER_ADDR", "10.0.0.1:8848");
        env::set_var("NACOS_CONFIG_AUTO_REFRESH", "true");
        env::set_var("NACOS_CONFIG_EXT_CONFIG__0__DATA_ID", "env.yaml");
    }

    let environment = Environment::new()
        .with_source(SystemEnvironmentPropertySource::<NacosConfigProperties>::with_default_prefix())
        .with_source(
            MapPropertySource::new("application")
                .with_property("nacos.config.server-addr", "127.0.0.1:8848")
                .with_property("nacos.config.namespace", "dev"),
        );
    let result = build_nacos_config_properties(&environment);

    unsafe {
        env::remove_var("NACOS_CONFIG_SERVER_ADDR");
        env::remove_var("NACOS_CONFIG_AUTO_REFRESH");
        env::remove_var("NACOS_CONFIG_EXT_CONFIG__0__DATA_ID");
    }

    let properties = result.expect("build failed");
    assert_eq!(properties.server_addr, "10.0.0.1:8848");
    assert_eq!(properties.namespace, "dev");
    assert!(properties.auto_refresh);
    assert_eq!(properties.ext_config[0].data_id, "env.yaml");
}

#[test]
#[serial]
fn standard_environment_reads_configured_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        "[nacos.config]\nnamespace = \"from-file\"\nbootstrap.enable = true"
    )
    .expect("write");

    unsafe {
        env::set_var("NACOS_CONFIG_PATH", file.path());
        env::set_var("NACOS_CONFIG_GROUP", "FROM_ENV");
    }

    let result = load_for_bootstrap(&Environment::standard());

    unsafe {
        env::remove_var("NACOS_CONFIG_PATH");
        env::remove_var("NACOS_CONFIG_GROUP");
    }

    let properties = result.expect("load failed").expect("bootstrap enabled");
    assert_eq!(properties.namespace, "from-file");
    assert_eq!(properties.group, "FROM_ENV");
}
