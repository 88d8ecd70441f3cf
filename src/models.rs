use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============ Contracts ============

/// A purchased plan and its installment schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContratoResponse {
    /// Unique identifier of the contract.
    pub id_contrato_ctt: i64,
    /// Person who owns the contract.
    pub id_pessoa_ctt: i64,
    /// Seller who closed the contract, if any.
    pub id_vendedor_ctt: Option<i64>,
    /// Installment plan chosen at creation.
    pub id_plano_pagamento_ctt: i64,
    /// Contract status code.
    pub id_situacao_ctt: i64,
    /// Origin channel code.
    pub id_origem_ctt: i64,
    /// Human-readable plan description.
    pub des_plano_pagamento: Option<String>,
    /// Number of installments in the plan.
    pub num_parcelas_ctt: Option<i32>,
    /// Total contract value.
    pub vlr_total_ctt: Option<f64>,
    /// Installment schedule.
    #[serde(default)]
    pub parcelas: Vec<ContratoParcelaDetails>,
    /// Timestamp of creation.
    pub dta_cadastro: DateTime<Utc>,
    /// Timestamp of last update.
    pub dta_alteracao: Option<DateTime<Utc>>,
    /// User who created the record.
    pub id_usuario_cadastro: Option<i64>,
    /// User who last modified the record.
    pub id_usuario_alteracao: Option<i64>,
}

impl ContratoResponse {
    /// Installments in schedule order (`cod_numparcela_cpc`).
    pub fn parcelas_ordenadas(&self) -> Vec<&ContratoParcelaDetails> {
        let mut parcelas: Vec<&ContratoParcelaDetails> = self.parcelas.iter().collect();
        parcelas.sort_by_key(|p| p.cod_numparcela_cpc);
        parcelas
    }

    /// Unpaid installments in schedule order.
    pub fn parcelas_em_aberto(&self) -> Vec<&ContratoParcelaDetails> {
        self.parcelas_ordenadas()
            .into_iter()
            .filter(|p| !p.is_paga())
            .collect()
    }

    /// First unpaid installment, if any.
    pub fn proxima_parcela(&self) -> Option<&ContratoParcelaDetails> {
        self.parcelas
            .iter()
            .filter(|p| !p.is_paga())
            .min_by_key(|p| p.cod_numparcela_cpc)
    }

    /// Every installment references this contract and no installment
    /// number repeats.
    pub fn parcelas_consistentes(&self) -> bool {
        let ordenadas = self.parcelas_ordenadas();
        let mesmo_contrato = ordenadas
            .iter()
            .all(|p| p.id_contrato_cpc == self.id_contrato_ctt);
        let numeros_unicos = ordenadas
            .windows(2)
            .all(|w| w[0].cod_numparcela_cpc != w[1].cod_numparcela_cpc);
        mesmo_contrato && numeros_unicos
    }
}

/// One scheduled payment unit of a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContratoParcelaDetails {
    /// Unique identifier of the installment.
    pub id_contrato_parcela_cpc: i64,
    /// Contract this installment belongs to.
    pub id_contrato_cpc: i64,
    /// Position of the installment within the contract (1-based).
    pub cod_numparcela_cpc: i32,
    /// Installment value.
    pub vlr_parcela_cpc: f64,
    /// Due date.
    pub dta_vencimento_cpc: NaiveDate,
    /// Payment timestamp; absent while unpaid.
    pub dta_pagamento_cpc: Option<DateTime<Utc>>,
    /// Payment status code.
    pub id_situacao_cpc: i64,
    /// Whether the installment has been settled.
    #[serde(default)]
    pub is_pago_cpc: bool,
    /// Timestamp of creation.
    pub dta_cadastro: DateTime<Utc>,
    /// Timestamp of last update.
    pub dta_alteracao: Option<DateTime<Utc>>,
    /// User who created the record.
    pub id_usuario_cadastro: Option<i64>,
    /// User who last modified the record.
    pub id_usuario_alteracao: Option<i64>,
}

impl ContratoParcelaDetails {
    pub fn is_paga(&self) -> bool {
        self.is_pago_cpc || self.dta_pagamento_cpc.is_some()
    }

    /// Unpaid and due before `today`.
    pub fn is_vencida(&self, today: NaiveDate) -> bool {
        !self.is_paga() && self.dta_vencimento_cpc < today
    }
}

// ============ People ============

/// A person as returned by the backend.
///
/// Optional fields are filled progressively along the onboarding steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pessoa {
    /// Unique identifier.
    pub id_pessoa_pes: i64,
    /// Full name.
    pub nom_pessoa_pes: String,
    /// CPF document number (digits only).
    pub num_cpf_pes: String,
    /// Email address.
    pub des_email_pes: Option<String>,
    /// Mobile phone (E.164).
    pub num_celular_pes: Option<String>,
    /// Date of birth.
    pub dta_nascimento_pes: Option<NaiveDate>,
    /// Postal code (CEP).
    pub num_cep_pda: Option<String>,
    /// Street.
    pub des_endereco_pda: Option<String>,
    /// Street number.
    pub num_endereco_pda: Option<String>,
    /// Full address text.
    pub des_endereco_completo_pda: Option<String>,
    /// Neighborhood.
    pub des_bairro_pda: Option<String>,
    /// Municipality (IBGE code).
    pub id_municipio_pda: Option<i64>,
    /// Reference point.
    pub des_ponto_referencia_pda: Option<String>,
    /// Timestamp of creation.
    pub dta_cadastro: Option<DateTime<Utc>>,
    /// Timestamp of last update.
    pub dta_alteracao: Option<DateTime<Utc>>,
}

/// Payload sent to create or complete a person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PessoaCreateData {
    pub nom_pessoa_pes: String,
    pub num_cpf_pes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub des_email_pes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_celular_pes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dta_nascimento_pes: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_cep_pda: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub des_endereco_pda: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_endereco_pda: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub des_endereco_completo_pda: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub des_bairro_pda: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_municipio_pda: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub des_ponto_referencia_pda: Option<String>,
}

// ============ Payments ============

/// A single PIX payment attempt for one installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixResponse {
    /// Unique identifier of the payment attempt.
    pub id_pix: i64,
    /// Installment being paid.
    pub id_contrato_parcela_cpc: i64,
    /// Origin code of the charge.
    pub cod_origem_pix: i64,
    /// Status code reported by the payment provider.
    pub cod_situacao_pix: i64,
    /// Charged amount.
    pub vlr_pix: f64,
    /// Copy-and-paste QR payload.
    pub des_qrcode_pix: Option<String>,
    /// QR image (base64 or URL).
    pub des_qrcode_imagem_pix: Option<String>,
    /// Provider transaction id.
    pub txid_pix: Option<String>,
    /// Timestamp of creation.
    pub dta_cadastro: DateTime<Utc>,
    /// Expiration of the QR code.
    pub dta_expiracao: Option<DateTime<Utc>>,
}

impl PixResponse {
    /// Whether a non-empty copy-and-paste payload is available.
    pub fn has_qrcode(&self) -> bool {
        self.des_qrcode_pix
            .as_deref()
            .is_some_and(|qr| !qr.trim().is_empty())
    }
}

// ============ Partner Products ============

/// Catalog item sold by a partner organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProdutoParceiroResponse {
    /// Unique identifier.
    pub id_produto_parceiro_ppa: i64,
    /// Partner organization.
    pub id_parceiro_ppa: i64,
    /// Partner display name.
    pub nom_parceiro: Option<String>,
    /// Product description.
    pub des_produto_ppa: String,
    /// Price.
    pub vlr_produto_ppa: f64,
    /// Last day the product can be sold.
    pub dta_validade_ppa: Option<NaiveDate>,
    /// Active flag.
    pub is_ativo_ppa: bool,
}

impl ProdutoParceiroResponse {
    /// Active and not past its expiration date.
    pub fn is_disponivel(&self, today: NaiveDate) -> bool {
        self.is_ativo_ppa && self.dta_validade_ppa.map_or(true, |validade| validade >= today)
    }
}

// ============ Credit Cards ============

/// Status value of a usable card.
pub const CARD_STATUS_ACTIVE: &str = "active";

/// Tokenized card reference; the full card number is never held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCreditCard {
    /// Card identifier at the payment provider.
    pub id: String,
    /// Name printed on the card.
    pub holder_name: String,
    /// Card brand (e.g., "visa", "mastercard").
    pub brand: Option<String>,
    /// Issuer identification digits.
    pub first_six_digits: String,
    /// Last four digits.
    pub last_four_digits: String,
    /// Expiration month (1-12).
    pub exp_month: u32,
    /// Expiration year (four digits).
    pub exp_year: i32,
    /// Lifecycle status (`"active"` or other).
    pub status: String,
    /// Billing address registered with the card.
    pub billing_address: BillingAddress,
    /// Timestamp of creation.
    pub created_at: Option<DateTime<Utc>>,
    /// Timestamp of last update.
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserCreditCard {
    pub fn is_active(&self) -> bool {
        self.status == CARD_STATUS_ACTIVE
    }
}

/// Billing address of a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingAddress {
    /// Street, number and complement.
    pub line_1: String,
    /// Additional address line.
    pub line_2: Option<String>,
    /// City.
    pub city: String,
    /// State (UF).
    pub state: String,
    /// Postal code.
    pub zip_code: String,
    /// Country code.
    pub country: Option<String>,
}

// ============ Session ============

/// Access token and profile data returned at login.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationData {
    /// Bearer token for the backend.
    pub access_token: String,
    /// Granted permissions.
    pub permissions: Option<Vec<String>>,
    /// Granted roles.
    pub roles: Option<Vec<String>>,
    /// Profile of the logged-in person.
    pub pessoa: Option<Pessoa>,
    /// Signature status of the person's contract.
    pub contrato_assinatura: Option<ContratoAssinatura>,
}

impl AuthorizationData {
    /// Value for the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_ref()
            .is_some_and(|perms| perms.iter().any(|p| p == permission))
    }
}

impl fmt::Debug for AuthorizationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationData")
            .field("access_token", &"<redacted>")
            .field("permissions", &self.permissions)
            .field("roles", &self.roles)
            .field("pessoa", &self.pessoa)
            .field("contrato_assinatura", &self.contrato_assinatura)
            .finish()
    }
}

/// Digital signature state of a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContratoAssinatura {
    /// Contract being signed.
    pub id_contrato_ctt: i64,
    /// Whether the person already signed.
    pub is_assinado: bool,
    /// Signature timestamp.
    pub dta_assinatura: Option<DateTime<Utc>>,
    /// Link to the signing page.
    pub url_assinatura: Option<String>,
}

/// Login endpoint response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Message describing the result.
    pub message: Option<String>,
    /// Session data.
    pub data: AuthorizationData,
}
