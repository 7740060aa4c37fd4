use optgate::domain::config::CatalogSettings;
use optgate::kernel::config::settings_from_toml;
use optgate::{ResolveError, registry_from_settings};
use std::fs;

#[test]
fn default_settings_use_builtin_catalog() {
    let registry = registry_from_settings(&CatalogSettings::default(), None).unwrap();
    assert!(registry.contains("NONLIN_FRSURF"));
}

#[test]
fn configured_and_extra_catalogs_are_layered_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let configured = dir.path().join("packages.toml");
    let extra = dir.path().join("tides.toml");
    fs::write(&configured, "[[flag]]\nname = \"ALLOW_PTRACERS\"\ncategory = \"algorithm\"\n")
        .unwrap();
    fs::write(
        &extra,
        "[[flag]]\nname = \"ALLOW_TIDES\"\ncategory = \"forcing\"\n\
         requires = [\"ALLOW_PTRACERS\"]\n",
    )
    .unwrap();

    let configured = configured.display().to_string();
    let raw = format!("[catalog]\nbuiltin = false\npath = {configured:?}\n");
    let settings = settings_from_toml(&raw).unwrap();

    let registry = registry_from_settings(&settings.catalog, Some(extra.as_path())).unwrap();
    let names: Vec<_> = registry.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["ALLOW_PTRACERS", "ALLOW_TIDES"]);

    let standalone = CatalogSettings { builtin: false, path: None };
    let err = registry_from_settings(&standalone, Some(extra.as_path())).unwrap_err();
    assert!(matches!(err, ResolveError::UnknownFlag { .. }));
}
