// Interface profiles
//
// The wire dialects the gateway can speak to an upstream, and what each one
// needs appended to the provider's api_base.

/// Static profile for one provider interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceProfile {
    pub name: &'static str,
    /// Appended to the provider's api_base when building the credential.
    pub path_suffix: &'static str,
    /// Upstream provider label the gateway expects in credential_info.
    pub upstream_provider: &'static str,
}

const INTERFACE_PROFILES: &[InterfaceProfile] = &[
    InterfaceProfile {
        name: "openai",
        path_suffix: "/v1",
        upstream_provider: "OpenAI_Compatible",
    },
    InterfaceProfile {
        name: "gemini",
        path_suffix: "/v1beta",
        upstream_provider: "Google_AI_Studio",
    },
    InterfaceProfile {
        name: "anthropic",
        path_suffix: "",
        upstream_provider: "Anthropic",
    },
];

/// Look up the profile for an interface name. `None` means the interface is
/// unknown to the gateway and the item referencing it should be skipped.
pub fn interface_profile(name: &str) -> Option<&'static InterfaceProfile> {
    INTERFACE_PROFILES.iter().find(|profile| profile.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_interfaces_resolve() {
        let openai = interface_profile("openai").unwrap();
        assert_eq!(openai.path_suffix, "/v1");
        assert_eq!(openai.upstream_provider, "OpenAI_Compatible");

        let gemini = interface_profile("gemini").unwrap();
        assert_eq!(gemini.path_suffix, "/v1beta");

        let anthropic = interface_profile("anthropic").unwrap();
        assert_eq!(anthropic.path_suffix, "");
        assert_eq!(anthropic.upstream_provider, "Anthropic");
    }

    #[test]
    fn unknown_interface_is_none() {
        assert!(interface_profile("cohere").is_none());
    }
}
