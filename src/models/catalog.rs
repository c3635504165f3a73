//! Static provider/model catalog.

use serde::Serialize;
use thiserror::Error;

use super::capabilities::ModelCapability;
use super::provider_key::ProviderKey;

/// One upstream vendor and the models it serves.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Provider {
    pub key: ProviderKey,
    pub display_name: &'static str,
    pub base_url: &'static str,
    pub models: &'static [ModelCapability],
}

impl Provider {
    /// Find a model by its API identifier.
    pub fn model(&self, model_id: &str) -> Option<&'static ModelCapability> {
        self.models.iter().find(|m| m.id == model_id)
    }
}

/// Registry miss.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("unknown provider '{0}'")]
    UnknownProvider(String),
    #[error("unknown model '{model}' for provider {provider}")]
    UnknownModel { provider: String, model: String },
}

const QWEN_MODELS: &[ModelCapability] = &[
    ModelCapability::vision(
        "qwen-vl-plus",
        "Qwen-VL-Plus",
        6000,
        "Multimodal model with image understanding, good value",
    ),
    ModelCapability::vision(
        "qwen-vl-max",
        "Qwen-VL-Max",
        6000,
        "Strongest multimodal model, best at document parsing",
    ),
    ModelCapability::text("qwen-turbo", "Qwen-Turbo", 6000, "Fast, low-latency text model"),
    ModelCapability::text("qwen-max", "Qwen-Max", 6000, "Strongest text understanding"),
];

const DEEPSEEK_MODELS: &[ModelCapability] = &[ModelCapability::text(
    "deepseek-chat",
    "DeepSeek-V3",
    8000,
    "Strong reasoning at very low cost",
)];

const GLM_MODELS: &[ModelCapability] = &[
    ModelCapability::vision("glm-4v", "GLM-4V", 4000, "Balanced image and text understanding"),
    ModelCapability::text("glm-4", "GLM-4", 4000, "Text-only model, strong at dialogue"),
];

const MOONSHOT_MODELS: &[ModelCapability] = &[ModelCapability::text(
    "moonshot-v1-128k",
    "Moonshot-v1-128k",
    4000,
    "128K context window, long-document specialist",
)];

static BUILTIN_PROVIDERS: [Provider; 4] = [
    Provider {
        key: ProviderKey::Qwen,
        display_name: "通义千问",
        base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1",
        models: QWEN_MODELS,
    },
    Provider {
        key: ProviderKey::DeepSeek,
        display_name: "DeepSeek",
        base_url: "https://api.deepseek.com/v1",
        models: DEEPSEEK_MODELS,
    },
    Provider {
        key: ProviderKey::Glm,
        display_name: "智谱AI",
        base_url: "https://open.bigmodel.cn/api/paas/v4",
        models: GLM_MODELS,
    },
    Provider {
        key: ProviderKey::Moonshot,
        display_name: "Kimi",
        base_url: "https://api.moonshot.cn/v1",
        models: MOONSHOT_MODELS,
    },
];

static BUILTIN: ProviderRegistry = ProviderRegistry {
    providers: &BUILTIN_PROVIDERS,
};

/// Read-only catalog of providers and their models.
#[derive(Debug, Clone, Copy)]
pub struct ProviderRegistry {
    providers: &'static [Provider],
}

impl ProviderRegistry {
    /// Build a registry over a custom provider table.
    pub const fn new(providers: &'static [Provider]) -> Self {
        Self { providers }
    }

    /// The baseline four-provider catalog.
    pub fn builtin() -> &'static ProviderRegistry {
        &BUILTIN
    }

    pub fn providers(&self) -> &'static [Provider] {
        self.providers
    }

    pub fn provider(&self, key: ProviderKey) -> Option<&'static Provider> {
        self.providers.iter().find(|p| p.key == key)
    }

    /// Resolve a (provider, model) pair to its capability record.
    pub fn lookup(
        &self,
        key: ProviderKey,
        model_id: &str,
    ) -> Result<&'static ModelCapability, LookupError> {
        let provider = self
            .provider(key)
            .ok_or_else(|| LookupError::UnknownProvider(key.to_string()))?;
        provider.model(model_id).ok_or_else(|| LookupError::UnknownModel {
            provider: key.to_string(),
            model: model_id.to_string(),
        })
    }

    /// Like [`lookup`](Self::lookup), taking the provider id as a raw string.
    pub fn lookup_str(
        &self,
        provider: &str,
        model_id: &str,
    ) -> Result<&'static ModelCapability, LookupError> {
        let key = ProviderKey::parse(provider)
            .ok_or_else(|| LookupError::UnknownProvider(provider.to_string()))?;
        self.lookup(key, model_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_four_providers() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(registry.providers().len(), 4);
        for key in ProviderKey::ALL {
            assert!(registry.provider(key).is_some(), "{key} missing");
        }
    }

    #[test]
    fn lookup_resolves_capabilities() {
        let cap = ProviderRegistry::builtin()
            .lookup(ProviderKey::Qwen, "qwen-vl-max")
            .unwrap();
        assert!(cap.supports_vision);
        assert_eq!(cap.max_tokens, 6000);
        assert_eq!(cap.display_name, "Qwen-VL-Max");
    }

    #[test]
    fn lookup_distinguishes_unknown_provider_and_model() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(
            registry.lookup_str("OPENAI", "gpt-4o"),
            Err(LookupError::UnknownProvider("OPENAI".into()))
        );
        assert_eq!(
            registry.lookup(ProviderKey::DeepSeek, "deepseek-reasoner"),
            Err(LookupError::UnknownModel {
                provider: "DEEPSEEK".into(),
                model: "deepseek-reasoner".into(),
            })
        );
    }

    #[test]
    fn custom_registry_only_sees_its_own_table() {
        static ONLY_GLM: [Provider; 1] = [Provider {
            key: ProviderKey::Glm,
            display_name: "GLM",
            base_url: "http://localhost",
            models: GLM_MODELS,
        }];
        let registry = ProviderRegistry::new(&ONLY_GLM);
        assert!(registry.lookup(ProviderKey::Glm, "glm-4").is_ok());
        assert!(matches!(
            registry.lookup(ProviderKey::Qwen, "qwen-turbo"),
            Err(LookupError::UnknownProvider(_))
        ));
    }
}
