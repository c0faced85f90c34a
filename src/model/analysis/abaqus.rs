use std::collections::BTreeMap;

use super::{Analysis, Invocation, Software};
use crate::error::FieldError;
use crate::model::File;

/// Environment variable FlexNet reads the license server from.
pub const LICENSE_ENV_VAR: &str = "LM_LICENSE_FILE";

/// Version labels shown by the platform and the codes a job document uses.
/// Newest first.
pub const VERSION_TABLE: &[(&str, &str)] = &[
    ("2024 HF4 (FlexNet Licensing)", "2024-hf4"),
    ("2023 HF9 (FlexNet Licensing)", "2023-hf9"),
    ("2023 HF4 (FlexNet Licensing)", "2023-hf4"),
    ("2023 HF2 (FlexNet Licensing)", "2023-HF2"),
    ("2023 HF1 (FlexNet Licensing)", "2023-HF1"),
    ("2023 Golden (FlexNet Licensing)", "2023-golden"),
    ("2022.HF9 (FlexNet Licensing)", "2022-2328"),
    ("2022.HF5 (FlexNet Licensing)", "2022-2241"),
    ("2022.HF4 (FlexNet Licensing)", "2022-2232"),
    ("2022.HF3 (FlexNet Licensing)", "2022-2223"),
    ("2022.HF1 (FlexNet Licensing)", "2022-2205"),
    ("2022 Golden (FlexNet Licensing)", "2022-golden"),
    ("2021.HF9 (FlexNet Licensing)", "2021-2140"),
    ("2021.HF6 (FlexNet Licensing)", "2021-2117"),
    ("2020.HF11 (FlexNet Licensing)", "2020-2136"),
    ("2020.HF6 (FlexNet Licensing)", "2020-2046"),
    ("2020.HF5 (FlexNet Licensing)", "2020-2038"),
    ("2020 Golden (FlexNet Licensing)", "2020"),
    ("2019.HF6 (FlexNet Licensing)", "2019-1947"),
    ("2019 (FlexNet Licensing)", "2019"),
    ("2018.HF10 (FlexNet Licensing)", "2018-1928"),
    ("2018 (FlexNet Licensing HF4)", "2018"),
    ("2017-efa-single-node", "2017-efa-single-node"),
    ("2017", "2017"),
    ("6.14-5", "6.14.5-pcmpi"),
    ("6.14-3", "6.14.3-pcmpi"),
    ("6.14-2", "6.14.2-pcmpi"),
    ("6.13-5", "6.13.5-ibm"),
    ("6.12-3", "6.12-3"),
];

/// Dassault Systèmes Abaqus, licensed through a FlexNet server
/// (`port@host`).
#[derive(Debug, Clone)]
pub struct Abaqus {
    pub invocation: Invocation,
    pub license_server: String,
}

impl Abaqus {
    pub fn new(
        version: impl Into<String>,
        command: impl Into<String>,
        input_files: Vec<File>,
        license_server: impl Into<String>,
    ) -> Self {
        Self {
            invocation: Invocation::new(version, command, input_files),
            license_server: license_server.into(),
        }
    }
}

impl Software for Abaqus {
    const CODE: &'static str = "abaqus";
    const DISPLAY_NAME: &'static str = "Abaqus";
    const BUILTIN_VERSIONS: &'static [(&'static str, &'static str)] = VERSION_TABLE;
}

impl Analysis for Abaqus {
    fn software_code(&self) -> &'static str {
        Self::CODE
    }

    fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    fn validate_variant(&self, field: &str, errors: &mut Vec<FieldError>) {
        let server = self.license_server.trim();
        if server.is_empty() {
            errors.push(FieldError::new(
                format!("{field}.license_server"),
                "must not be empty",
            ));
        } else if !server.contains('@') {
            errors.push(FieldError::new(
                format!("{field}.license_server"),
                format!("expected port@host, got '{server}'"),
            ));
        }
    }

    fn env_vars(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(
            LICENSE_ENV_VAR.to_string(),
            self.license_server.trim().to_string(),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Hardware;

    fn abaqus(license: &str) -> Abaqus {
        Abaqus::new(
            "2022-2328",
            "abaqus j=job1.inp interactive",
            vec![File::load_from_id("zNXApj")],
            license,
        )
    }

    #[test]
    fn valid_abaqus_has_no_errors() {
        let mut errors = Vec::new();
        abaqus("27101@license-host").validate("analyses[0]", &mut errors);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn license_server_is_required() {
        for license in ["", "license-host"] {
            let mut errors = Vec::new();
            abaqus(license).validate("analyses[0]", &mut errors);
            assert_eq!(errors.len(), 1, "license={license:?}");
            assert_eq!(errors[0].field, "analyses[0].license_server");
        }
    }

    #[test]
    fn version_table_has_unique_labels() {
        let mut labels: Vec<_> = Abaqus::BUILTIN_VERSIONS.iter().map(|(l, _)| *l).collect();
        let total = labels.len();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), total);
        assert_eq!(Abaqus::BUILTIN_VERSIONS[0], ("2024 HF4 (FlexNet Licensing)", "2024-hf4"));
    }

    #[test]
    fn payload_carries_license_env_var() {
        let payload = abaqus("27101@license-host")
            .to_payload("2022-2328", &Hardware::default())
            .unwrap();
        assert_eq!(payload.analysis.code, "abaqus");
        assert_eq!(payload.analysis.version, "2022-2328");
        assert_eq!(payload.command, "abaqus j=job1.inp interactive");
        assert_eq!(payload.input_files[0].id, "zNXApj");
        assert_eq!(
            payload.env_vars.get(LICENSE_ENV_VAR).map(String::as_str),
            Some("27101@license-host")
        );
    }
}
