//! ApiClient - Backend REST Facade
//!
//! One async method per backend capability. Every call goes to a fixed path
//! below the configured base URL, is logged on the way out and on the way
//! back, and has its failures translated by [`super::http`]. There is no
//! retry, caching or batching here.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, info};

use crate::config::ApiConfig;
use crate::domain::admin::{AdminSettings, CompanyInfo, LogoUploaded, ProductInfo, Upload};
use crate::domain::analysis::{
    AnalysisRequest, AnalysisResponse, ChartsResponse, Co2AnalysisResponse, SensitivityResponse,
};
use crate::domain::calculation::{
    CalculationRequest, CalculationResponse, LivePricingResponse, QuickCalculation,
    ScenariosResponse,
};
use crate::domain::crm::{CrmProject, Customer, CustomerDocument, NewDocument};
use crate::domain::pdf::{PdfGenerationRequest, PdfGenerationResponse, PdfStatusResponse, TaskStarted};
use crate::domain::project::{ProjectData, ProjectSaved};
use crate::domain::{Created, HealthStatus, MessageResponse, MessageWithResult};
use crate::error::Result;
use crate::services::http::{translate_send_error, translate_status};

// ==================== Envelopes ====================

#[derive(serde::Deserialize)]
struct ProjectEnvelope {
    project_data: ProjectData,
}

#[derive(serde::Deserialize)]
struct ProjectsEnvelope {
    #[serde(default)]
    projects: Vec<Value>,
}

#[derive(serde::Deserialize)]
struct CompanyEnvelope {
    company_info: CompanyInfo,
}

#[derive(serde::Deserialize)]
struct ProductsEnvelope {
    #[serde(default)]
    products: Vec<ProductInfo>,
}

#[derive(serde::Deserialize)]
struct ProductEnvelope {
    product: ProductInfo,
}

#[derive(serde::Deserialize)]
struct SettingsEnvelope {
    settings: AdminSettings,
}

#[derive(serde::Deserialize)]
struct CustomersEnvelope {
    #[serde(default)]
    customers: Vec<Customer>,
}

#[derive(serde::Deserialize)]
struct CustomerEnvelope {
    customer: Customer,
}

#[derive(serde::Deserialize)]
struct CrmProjectsEnvelope {
    #[serde(default)]
    projects: Vec<CrmProject>,
}

#[derive(serde::Deserialize)]
struct CrmProjectEnvelope {
    project: CrmProject,
}

#[derive(serde::Deserialize)]
struct PipelineEnvelope {
    pipeline: Value,
}

#[derive(serde::Deserialize)]
struct DashboardEnvelope {
    dashboard: Value,
}

#[derive(serde::Deserialize)]
struct DocumentsEnvelope {
    #[serde(default)]
    documents: Vec<CustomerDocument>,
}

#[derive(Serialize)]
struct QuickRequest<'a> {
    project_data: &'a ProjectData,
}

#[derive(Serialize)]
struct Page {
    limit: u32,
    offset: u32,
}

#[derive(Serialize)]
struct CategoryFilter<'a> {
    category: &'a str,
}

// ==================== Client ====================

/// Backend REST client
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    health_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("health_url", &self.health_url)
            .finish()
    }
}

impl ApiClient {
    /// Create a client from the API configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            health_url: config.health_url.clone(),
        })
    }

    /// Base URL all API paths are joined to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ==================== Transport ====================

    async fn execute(&self, method: Method, url: String, request: RequestBuilder) -> Result<Response> {
        info!(method = %method, url = %url, "API Request");

        let response = request.send().await.map_err(|e| {
            error!(method = %method, url = %url, error = %e, "API Request Error");
            translate_send_error(e)
        })?;

        let status = response.status();
        info!(status = status.as_u16(), url = %url, "API Response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = translate_status(status, &body);
        error!(status = status.as_u16(), url = %url, error = %err, "API Response Error");
        Err(err)
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, path: &str, request: RequestBuilder) -> Result<T> {
        let url = self.url(path);
        let response = self.execute(method, url, request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.http.get(self.url(path));
        self.send(Method::GET, path, request).await
    }

    async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.http.get(self.url(path)).query(query);
        self.send(Method::GET, path, request).await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.http.post(self.url(path)).json(body);
        self.send(Method::POST, path, request).await
    }

    async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.http.put(self.url(path)).json(body);
        self.send(Method::PUT, path, request).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.http.delete(self.url(path));
        self.send(Method::DELETE, path, request).await
    }

    async fn post_file<T: DeserializeOwned>(&self, path: &str, upload: Upload) -> Result<T> {
        let mut part = Part::bytes(upload.bytes).file_name(upload.file_name);
        if let Some(mime) = upload.mime.as_deref() {
            part = part.mime_str(mime)?;
        }
        let form = Form::new().part("file", part);
        let request = self.http.post(self.url(path)).multipart(form);
        self.send(Method::POST, path, request).await
    }

    // ==================== Project Management ====================

    pub async fn save_project(&self, project_data: &ProjectData) -> Result<ProjectSaved> {
        self.post("/project", project_data).await
    }

    pub async fn get_project(&self, project_id: i64) -> Result<ProjectData> {
        let envelope: ProjectEnvelope = self.get(&format!("/project/{project_id}")).await?;
        Ok(envelope.project_data)
    }

    pub async fn list_projects(&self, limit: u32, offset: u32) -> Result<Vec<Value>> {
        let envelope: ProjectsEnvelope = self
            .get_with_query("/projects", &Page { limit, offset })
            .await?;
        Ok(envelope.projects)
    }

    // ==================== Calculations ====================

    pub async fn calculate_project(&self, request: &CalculationRequest) -> Result<CalculationResponse> {
        self.post("/calculate", request).await
    }

    pub async fn calculate_quick(&self, project_data: &ProjectData) -> Result<QuickCalculation> {
        self.post("/calculate_quick", &QuickRequest { project_data }).await
    }

    pub async fn calculate_live_pricing<B>(&self, data: &B) -> Result<LivePricingResponse>
    where
        B: Serialize + ?Sized,
    {
        self.post("/live_pricing", data).await
    }

    pub async fn calculate_scenarios(&self, request: &CalculationRequest) -> Result<ScenariosResponse> {
        self.post("/scenarios", request).await
    }

    // ==================== PDF Generation ====================

    pub async fn generate_pdf(&self, request: &PdfGenerationRequest) -> Result<PdfGenerationResponse> {
        self.post("/generate_pdf", request).await
    }

    pub async fn get_pdf_status(&self, task_id: &str) -> Result<PdfStatusResponse> {
        self.get(&format!("/task_status/{task_id}")).await
    }

    /// Download the rendered offer as raw bytes
    pub async fn download_pdf(&self, task_id: &str) -> Result<Vec<u8>> {
        let path = format!("/download_pdf/{task_id}");
        let url = self.url(&path);
        let request = self.http.get(&url);
        let response = self.execute(Method::GET, url, request).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn generate_multi_pdf<B>(&self, data: &B) -> Result<TaskStarted>
    where
        B: Serialize + ?Sized,
    {
        self.post("/generate_multi_pdf", data).await
    }

    // ==================== Analysis ====================

    pub async fn generate_analysis(&self, request: &AnalysisRequest) -> Result<AnalysisResponse> {
        self.post("/analysis", request).await
    }

    pub async fn generate_charts(&self, request: &AnalysisRequest) -> Result<ChartsResponse> {
        self.post("/charts", request).await
    }

    pub async fn calculate_co2_analysis(&self, request: &AnalysisRequest) -> Result<Co2AnalysisResponse> {
        self.post("/co2_analysis", request).await
    }

    pub async fn calculate_sensitivity(&self, request: &AnalysisRequest) -> Result<SensitivityResponse> {
        self.post("/sensitivity_analysis", request).await
    }

    // ==================== Admin Panel ====================

    pub async fn get_company_info(&self) -> Result<CompanyInfo> {
        let envelope: CompanyEnvelope = self.get("/company_info").await?;
        Ok(envelope.company_info)
    }

    pub async fn save_company_info(&self, company: &CompanyInfo) -> Result<MessageWithResult> {
        self.post("/company_info", company).await
    }

    pub async fn list_products(&self, category: Option<&str>) -> Result<Vec<ProductInfo>> {
        let envelope: ProductsEnvelope = match category {
            Some(category) => {
                self.get_with_query("/products", &CategoryFilter { category })
                    .await?
            }
            None => self.get("/products").await?,
        };
        Ok(envelope.products)
    }

    pub async fn add_product(&self, product: &ProductInfo) -> Result<Created> {
        self.post("/products", product).await
    }

    pub async fn get_product(&self, product_id: i64) -> Result<ProductInfo> {
        let envelope: ProductEnvelope = self.get(&format!("/products/{product_id}")).await?;
        Ok(envelope.product)
    }

    pub async fn update_product(&self, product_id: i64, product: &ProductInfo) -> Result<MessageWithResult> {
        self.put(&format!("/products/{product_id}"), product).await
    }

    pub async fn delete_product(&self, product_id: i64) -> Result<MessageWithResult> {
        self.delete(&format!("/products/{product_id}")).await
    }

    pub async fn upload_price_matrix(&self, file: Upload) -> Result<MessageWithResult> {
        self.post_file("/upload_price_matrix", file).await
    }

    pub async fn get_admin_settings(&self) -> Result<AdminSettings> {
        let envelope: SettingsEnvelope = self.get("/settings").await?;
        Ok(envelope.settings)
    }

    pub async fn save_admin_settings(&self, settings: &AdminSettings) -> Result<MessageResponse> {
        self.post("/settings", settings).await
    }

    pub async fn upload_logo(&self, file: Upload) -> Result<LogoUploaded> {
        self.post_file("/upload_logo", file).await
    }

    // ==================== CRM ====================

    pub async fn list_customers(&self, limit: u32, offset: u32) -> Result<Vec<Customer>> {
        let envelope: CustomersEnvelope = self
            .get_with_query("/customers", &Page { limit, offset })
            .await?;
        Ok(envelope.customers)
    }

    pub async fn create_customer(&self, customer: &Customer) -> Result<Created> {
        self.post("/customers", customer).await
    }

    pub async fn get_customer(&self, customer_id: i64) -> Result<Customer> {
        let envelope: CustomerEnvelope = self.get(&format!("/customers/{customer_id}")).await?;
        Ok(envelope.customer)
    }

    pub async fn update_customer(&self, customer_id: i64, customer: &Customer) -> Result<MessageWithResult> {
        self.put(&format!("/customers/{customer_id}"), customer).await
    }

    pub async fn get_customer_projects(&self, customer_id: i64) -> Result<Vec<CrmProject>> {
        let envelope: CrmProjectsEnvelope = self
            .get(&format!("/customers/{customer_id}/projects"))
            .await?;
        Ok(envelope.projects)
    }

    pub async fn create_crm_project(&self, project: &CrmProject) -> Result<Created> {
        self.post("/projects", project).await
    }

    pub async fn get_crm_project(&self, project_id: i64) -> Result<CrmProject> {
        let envelope: CrmProjectEnvelope = self.get(&format!("/projects/{project_id}")).await?;
        Ok(envelope.project)
    }

    pub async fn update_crm_project(&self, project_id: i64, project: &CrmProject) -> Result<MessageWithResult> {
        self.put(&format!("/projects/{project_id}"), project).await
    }

    pub async fn get_pipeline(&self) -> Result<Value> {
        let envelope: PipelineEnvelope = self.get("/pipeline").await?;
        Ok(envelope.pipeline)
    }

    pub async fn get_dashboard(&self) -> Result<Value> {
        let envelope: DashboardEnvelope = self.get("/dashboard").await?;
        Ok(envelope.dashboard)
    }

    pub async fn add_customer_document(&self, document: &NewDocument) -> Result<Created> {
        self.post("/documents", document).await
    }

    pub async fn get_customer_documents(&self, customer_id: i64) -> Result<Vec<CustomerDocument>> {
        let envelope: DocumentsEnvelope = self
            .get(&format!("/customers/{customer_id}/documents"))
            .await?;
        Ok(envelope.documents)
    }

    // ==================== Health ====================

    /// Probe the backend's health endpoint at the bare host root
    pub async fn health_check(&self) -> Result<HealthStatus> {
        let url = self.health_url.clone();
        let request = self.http.get(&url);
        let response = self.execute(Method::GET, url, request).await?;
        Ok(response.json::<HealthStatus>().await?)
    }
}
