//! CLI helper tests.
//!
//! The CLI is a binary crate, so these exercise the same library calls the
//! commands make: loading program files, decoding replies and resolving
//! configuration.

mod program_files {
    use std::io::Write;

    use forest_quil::Program;

    fn write_program(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_bell_program_file() {
        let file = write_program("# Bell pair\nH 0\nCNOT 0 1\n\nMEASURE 0 [0]\nMEASURE 1 [1]\n");
        let text = std::fs::read_to_string(file.path()).unwrap();
        let program = Program::from(text.as_str());

        assert_eq!(program.len(), 4);
        assert_eq!(program.instructions()[0], "H 0");
        assert_eq!(program.instructions()[3], "MEASURE 1 [1]");
    }

    #[test]
    fn test_comment_only_file_is_empty() {
        let file = write_program("# nothing here\n\n");
        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(Program::from(text.as_str()).is_empty());
    }

    #[test]
    fn test_inline_instructions_collect() {
        let program: Program = ["X 0", "MEASURE 0 [0]"].into_iter().collect();
        assert_eq!(program.out(), "X 0\nMEASURE 0 [0]");
    }
}

mod wavefunction_output {
    use forest_wire::{decode, encode};
    use num_complex::Complex64;

    #[test]
    fn test_decoded_reply_renders_as_ket() {
        let amps = [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)];
        let octets = encode(&amps, &[1]);

        let (wf, memory) = decode(&octets, octets.len(), &[0]).unwrap();
        assert_eq!(memory, vec![1]);
        assert_eq!(wf.to_string(), "(1.0000+0.0000i)|1>");
    }
}

mod configuration {
    use forest_adapter_qvm::ForestConfig;

    #[test]
    fn test_config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forest.yaml");
        std::fs::write(
            &path,
            "endpoint: http://127.0.0.1:5000/qvm\napi_key: cli-key\n",
        )
        .unwrap();

        let config = ForestConfig::from_file(&path).unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:5000/qvm");
        assert_eq!(config.require_api_key().unwrap(), "cli-key");
    }
}
