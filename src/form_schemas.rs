//! Schemas of the onboarding forms and the typed records they produce.
//!
//! - `contrato_schema`: new-contract creation
//! - `pessoa_schema`: personal-data step of the onboarding flow
//! - `endereco_schema`: address step of the onboarding flow

use crate::br_validators::{
    is_valid_cpf, is_valid_email, normalize_br_phone, only_digits, parse_birth_date,
};
use crate::models::PessoaCreateData;
use crate::validation::{Field, Schema, REQUIRED_MESSAGE};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const PLANO_OBRIGATORIO: &str = "Choose a plan!";
pub const DIA_PAGAMENTO_INVALIDO: &str = "Value must be between 1 and 31";
pub const DUAS_PALAVRAS: &str = "Name must contain at least two words.";
pub const MUNICIPIO_OBRIGATORIO: &str = "Choose a municipality.";
pub const BAIRRO_VAZIO: &str = "Neighborhood cannot be empty.";
pub const PONTO_REFERENCIA_TAMANHO: &str = "Must be between 1 and 120 characters.";
pub const CPF_INVALIDO: &str = "Invalid CPF.";
pub const TELEFONE_INVALIDO: &str = "Invalid phone number.";
pub const EMAIL_INVALIDO: &str = "Invalid e-mail.";
pub const DATA_INVALIDA: &str = "Invalid date.";

/// Value stored when the customer gives no reference point.
pub const PONTO_REFERENCIA_PADRAO: &str = "None";
pub const PONTO_REFERENCIA_MAX: usize = 120;

/// Parses a payment day (`"1"`..`"31"`).
///
/// Only integral text passes: surrounding whitespace and leading zeros are
/// accepted, `"1.0"` is not.
pub fn parse_dia_pagamento(raw: &str) -> Option<u8> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|day| (1..=31).contains(day))
}

/// Schema of the new-contract form.
pub fn contrato_schema() -> Schema {
    Schema::new("contrato")
        .field(Field::integer("id_pessoa_ctt"))
        .field(Field::integer("id_vendedor_ctt").nullable())
        .field(Field::integer("id_plano_pagamento_ctt"))
        .field(Field::integer("id_plano_pagamento_ctt_ctrl").min(1.0, PLANO_OBRIGATORIO))
        .field(Field::integer("id_situacao_ctt"))
        .field(Field::integer("id_origem_ctt"))
        .field(Field::text("dta_dia_cpc").rule(DIA_PAGAMENTO_INVALIDO, |v| {
            v.as_str().and_then(parse_dia_pagamento).is_some()
        }))
        .field(Field::number("vlr_parcela_cpc").nullable())
        .field(Field::integer("id_forma_pagamento_ctrl").optional())
}

/// Schema of the address step.
pub fn endereco_schema() -> Schema {
    Schema::new("endereco")
        .field(Field::text("num_cep_pda").non_empty(REQUIRED_MESSAGE))
        .field(
            Field::text("des_endereco_pda")
                .non_empty(REQUIRED_MESSAGE)
                .min_words(2, DUAS_PALAVRAS),
        )
        .field(Field::text("num_endereco_pda").non_empty(REQUIRED_MESSAGE))
        .field(Field::text("des_endereco_completo_pda").optional())
        .field(
            Field::text("des_bairro_pda")
                .optional()
                .non_empty(BAIRRO_VAZIO),
        )
        .field(Field::integer("id_municipio_pda").min(1.0, MUNICIPIO_OBRIGATORIO))
        .field(
            Field::text("des_ponto_referencia_pda")
                .with_default(PONTO_REFERENCIA_PADRAO)
                .length_between(1, PONTO_REFERENCIA_MAX, PONTO_REFERENCIA_TAMANHO),
        )
}

/// Schema of the personal-data step, checking birth dates against today.
pub fn pessoa_schema() -> Schema {
    pessoa_schema_on(Utc::now().date_naive())
}

/// Schema of the personal-data step with a fixed reference date.
pub fn pessoa_schema_on(today: NaiveDate) -> Schema {
    Schema::new("pessoa")
        .field(
            Field::text("nom_pessoa_pes")
                .non_empty(REQUIRED_MESSAGE)
                .min_words(2, DUAS_PALAVRAS),
        )
        .field(
            Field::text("num_cpf_pes")
                .rule(CPF_INVALIDO, |v| v.as_str().is_some_and(is_valid_cpf)),
        )
        .field(Field::text("num_celular_pes").rule(TELEFONE_INVALIDO, |v| {
            v.as_str().is_some_and(|s| normalize_br_phone(s).is_ok())
        }))
        .field(
            Field::text("des_email_pes")
                .nullable()
                .rule(EMAIL_INVALIDO, |v| v.as_str().is_some_and(is_valid_email)),
        )
        .field(
            Field::text("dta_nascimento_pes")
                .optional()
                .rule(DATA_INVALIDA, move |v| {
                    v.as_str()
                        .and_then(|s| parse_birth_date(s, today))
                        .is_some()
                }),
        )
}

/// Names accepted by [`schema_by_name`].
pub const FORM_NAMES: [&str; 3] = ["contrato", "pessoa", "endereco"];

/// Looks a form schema up by name.
pub fn schema_by_name(name: &str) -> Option<Schema> {
    match name {
        "contrato" => Some(contrato_schema()),
        "pessoa" => Some(pessoa_schema()),
        "endereco" => Some(endereco_schema()),
        _ => None,
    }
}

/// Validated new-contract form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContratoCreateData {
    pub id_pessoa_ctt: i64,
    pub id_vendedor_ctt: Option<i64>,
    pub id_plano_pagamento_ctt: i64,
    pub id_plano_pagamento_ctt_ctrl: i64,
    pub id_situacao_ctt: i64,
    pub id_origem_ctt: i64,
    /// Day of month the installments fall due, as typed (`"1"`..`"31"`).
    pub dta_dia_cpc: String,
    pub vlr_parcela_cpc: Option<f64>,
    pub id_forma_pagamento_ctrl: Option<i64>,
}

impl ContratoCreateData {
    pub fn dia_pagamento(&self) -> Option<u8> {
        parse_dia_pagamento(&self.dta_dia_cpc)
    }
}

/// Validated address step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnderecoStepData {
    pub num_cep_pda: String,
    pub des_endereco_pda: String,
    pub num_endereco_pda: String,
    pub des_endereco_completo_pda: Option<String>,
    pub des_bairro_pda: Option<String>,
    pub id_municipio_pda: i64,
    pub des_ponto_referencia_pda: String,
}

/// Validated personal-data step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PessoaStepData {
    pub nom_pessoa_pes: String,
    pub num_cpf_pes: String,
    pub num_celular_pes: String,
    pub des_email_pes: Option<String>,
    pub dta_nascimento_pes: Option<String>,
}

impl PessoaStepData {
    /// Merges the personal-data step with the (optional) address step into
    /// the payload sent to the person endpoint.
    ///
    /// CPF is reduced to digits, the phone to E.164 and the birth date to an
    /// ISO date. Both steps are expected to have passed their schemas, with
    /// the birth date checked against the same `today`.
    pub fn into_create_data(
        self,
        endereco: Option<EnderecoStepData>,
        today: NaiveDate,
    ) -> PessoaCreateData {
        let num_celular_pes = normalize_br_phone(&self.num_celular_pes)
            .unwrap_or_else(|_| only_digits(&self.num_celular_pes));
        let dta_nascimento_pes = self
            .dta_nascimento_pes
            .as_deref()
            .and_then(|raw| parse_birth_date(raw, today));

        let mut data = PessoaCreateData {
            nom_pessoa_pes: self.nom_pessoa_pes.trim().to_string(),
            num_cpf_pes: only_digits(&self.num_cpf_pes),
            num_celular_pes: Some(num_celular_pes),
            des_email_pes: self.des_email_pes.map(|e| e.trim().to_lowercase()),
            dta_nascimento_pes,
            ..PessoaCreateData::default()
        };

        if let Some(endereco) = endereco {
            data.num_cep_pda = Some(only_digits(&endereco.num_cep_pda));
            data.des_endereco_pda = Some(endereco.des_endereco_pda);
            data.num_endereco_pda = Some(endereco.num_endereco_pda);
            data.des_endereco_completo_pda = endereco.des_endereco_completo_pda;
            data.des_bairro_pda = endereco.des_bairro_pda;
            data.id_municipio_pda = Some(endereco.id_municipio_pda);
            data.des_ponto_referencia_pda = Some(endereco.des_ponto_referencia_pda);
        }

        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_dia_pagamento() {
        assert_eq!(parse_dia_pagamento("1"), Some(1));
        assert_eq!(parse_dia_pagamento(" 31 "), Some(31));
        assert_eq!(parse_dia_pagamento("05"), Some(5));
        assert_eq!(parse_dia_pagamento("0"), None);
        assert_eq!(parse_dia_pagamento("32"), None);
        assert_eq!(parse_dia_pagamento("-1"), None);
        assert_eq!(parse_dia_pagamento("abc"), None);
    }

    #[test]
    fn test_schema_by_name() {
        for name in FORM_NAMES {
            assert_eq!(schema_by_name(name).map(|s| s.name()), Some(name));
        }
        assert!(schema_by_name("pagamento").is_none());
    }

    #[test]
    fn test_contrato_parse_typed() {
        let data: ContratoCreateData = contrato_schema()
            .parse(&json!({
                "id_pessoa_ctt": 10,
                "id_plano_pagamento_ctt": "3",
                "id_plano_pagamento_ctt_ctrl": 3,
                "id_situacao_ctt": 1,
                "id_origem_ctt": 2,
                "dta_dia_cpc": "10",
                "vlr_parcela_cpc": null
            }))
            .unwrap();

        assert_eq!(data.id_plano_pagamento_ctt, 3);
        assert_eq!(data.id_vendedor_ctt, None);
        assert_eq!(data.vlr_parcela_cpc, None);
        assert_eq!(data.dia_pagamento(), Some(10));
    }

    #[test]
    fn test_pessoa_into_create_data() {
        let pessoa = PessoaStepData {
            nom_pessoa_pes: " Maria Souza ".to_string(),
            num_cpf_pes: "529.982.247-25".to_string(),
            num_celular_pes: "(11) 98765-4321".to_string(),
            des_email_pes: Some("Maria@Example.com".to_string()),
            dta_nascimento_pes: Some("20/05/1990".to_string()),
        };
        let endereco = EnderecoStepData {
            num_cep_pda: "01310-100".to_string(),
            des_endereco_pda: "Avenida Paulista".to_string(),
            num_endereco_pda: "1000".to_string(),
            des_endereco_completo_pda: None,
            des_bairro_pda: Some("Bela Vista".to_string()),
            id_municipio_pda: 3550308,
            des_ponto_referencia_pda: PONTO_REFERENCIA_PADRAO.to_string(),
        };

        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let data = pessoa.into_create_data(Some(endereco), today);

        assert_eq!(data.nom_pessoa_pes, "Maria Souza");
        assert_eq!(data.num_cpf_pes, "52998224725");
        assert_eq!(data.num_celular_pes.as_deref(), Some("+5511987654321"));
        assert_eq!(data.des_email_pes.as_deref(), Some("maria@example.com"));
        assert_eq!(data.dta_nascimento_pes, NaiveDate::from_ymd_opt(1990, 5, 20));
        assert_eq!(data.num_cep_pda.as_deref(), Some("01310100"));
        assert_eq!(data.id_municipio_pda, Some(3550308));
    }

    #[test]
    fn test_into_create_data_uses_given_date() {
        let pessoa = PessoaStepData {
            nom_pessoa_pes: "Maria Souza".to_string(),
            num_cpf_pes: "52998224725".to_string(),
            num_celular_pes: "11987654321".to_string(),
            des_email_pes: None,
            dta_nascimento_pes: Some("16/10/2026".to_string()),
        };
        let validated_on = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let day_before = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();

        let kept = pessoa.clone().into_create_data(None, validated_on);
        assert_eq!(kept.dta_nascimento_pes, Some(validated_on));

        let dropped = pessoa.into_create_data(None, day_before);
        assert_eq!(dropped.dta_nascimento_pes, None);
        assert_eq!(dropped.num_cep_pda, None);
    }

    #[test]
    fn test_dia_pagamento_rejects_fractional_text() {
        assert_eq!(parse_dia_pagamento("1.0"), None);
        assert_eq!(parse_dia_pagamento("15.5"), None);
        assert!(contrato_schema()
            .validate(&json!({
                "id_pessoa_ctt": 10,
                "id_plano_pagamento_ctt": 3,
                "id_plano_pagamento_ctt_ctrl": 3,
                "id_situacao_ctt": 1,
                "id_origem_ctt": 2,
                "dta_dia_cpc": "1.0"
            }))
            .is_err());
    }
}
