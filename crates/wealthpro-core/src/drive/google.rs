//! Google Drive v3 / Sheets v4 backend.
//!
//! Every call is a blocking HTTPS round trip authorised with a bearer token
//! the caller supplies. There is no retry policy; a failed call surfaces as
//! [`CrmError::Http`] with the transport error attached.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::traits::DriveClient;
use super::types::{ChildQuery, DriveItem, ItemKind, FOLDER_MIME, SPREADSHEET_MIME};
use crate::error::{CrmError, Result};

const DRIVE_API: &str = "https://www.googleapis.com/drive/v3";
const UPLOAD_API: &str = "https://www.googleapis.com/upload/drive/v3";
const SHEETS_API: &str = "https://sheets.googleapis.com/v4";

const FILE_FIELDS: &str = "id,name,mimeType,parents,createdTime,trashed";
const PAGE_SIZE: &str = "1000";
const MULTIPART_BOUNDARY: &str = "wealthpro-upload-boundary";

/// Connection settings for [`GoogleDrive`].
#[derive(Debug, Clone)]
pub struct GoogleDriveConfig {
    /// OAuth access token supplied by the caller
    pub access_token: String,

    /// Connect and overall request timeout
    pub timeout: Duration,
}

impl GoogleDriveConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Drive facade backed by the Google APIs.
pub struct GoogleDrive {
    agent: ureq::Agent,
    bearer: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileResource {
    id: String,
    name: String,
    mime_type: String,
    #[serde(default)]
    parents: Vec<String>,
    created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    trashed: bool,
}

impl From<FileResource> for DriveItem {
    fn from(file: FileResource) -> Self {
        DriveItem {
            kind: ItemKind::from_mime(&file.mime_type),
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
            parents: file.parents,
            created_time: file.created_time,
            trashed: file.trashed,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<FileResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl GoogleDrive {
    pub fn new(config: GoogleDriveConfig) -> Result<Self> {
        if config.access_token.trim().is_empty() {
            return Err(CrmError::Config("Google access token is empty".to_string()));
        }
        let agent = ureq::Agent::new_with_config(
            ureq::config::Config::builder()
                .timeout_connect(Some(config.timeout))
                .timeout_global(Some(config.timeout))
                .build(),
        );
        Ok(Self {
            agent,
            bearer: format!("Bearer {}", config.access_token),
        })
    }

    fn file_url(file_id: &str) -> String {
        format!("{}/files/{}", DRIVE_API, urlencoding::encode(file_id))
    }

    fn values_url(spreadsheet_id: &str, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            SHEETS_API,
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(range)
        )
    }

    fn create_metadata(
        &self,
        operation: &'static str,
        metadata: &serde_json::Value,
    ) -> Result<DriveItem> {
        let file: FileResource = self
            .agent
            .post(&format!("{}/files", DRIVE_API))
            .header("Authorization", self.bearer.as_str())
            .query("fields", FILE_FIELDS)
            .query("supportsAllDrives", "true")
            .send_json(metadata)
            .map_err(|e| CrmError::http(operation, e))?
            .body_mut()
            .read_json()
            .map_err(|e| CrmError::http(operation, e))?;
        Ok(file.into())
    }
}

/// Build a Drive `q` expression for the children of `parent_id`.
pub(crate) fn build_child_query(parent_id: &str, query: &ChildQuery) -> String {
    let mut clauses = vec![
        format!("'{}' in parents", escape_query_value(parent_id)),
        "trashed = false".to_string(),
    ];
    if let Some(name) = &query.name {
        clauses.push(format!("name = '{}'", escape_query_value(name)));
    }
    match query.kind {
        Some(ItemKind::Folder) => clauses.push(format!("mimeType = '{}'", FOLDER_MIME)),
        Some(ItemKind::Spreadsheet) => {
            clauses.push(format!("mimeType = '{}'", SPREADSHEET_MIME))
        }
        Some(ItemKind::File) => {
            clauses.push(format!("mimeType != '{}'", FOLDER_MIME));
            clauses.push(format!("mimeType != '{}'", SPREADSHEET_MIME));
        }
        None => {}
    }
    clauses.join(" and ")
}

/// Append one listing page; returns the token for the next page, if any.
fn merge_page(items: &mut Vec<DriveItem>, page: FileList) -> Option<String> {
    items.extend(page.files.into_iter().map(DriveItem::from));
    page.next_page_token.filter(|token| !token.is_empty())
}

fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Build a `multipart/related` upload body: JSON metadata then raw content.
fn multipart_body(metadata: &serde_json::Value, mime_type: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(content.len() + 256);
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{meta}\r\n--{b}\r\nContent-Type: {mime}\r\n\r\n",
            b = MULTIPART_BOUNDARY,
            meta = metadata,
            mime = mime_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--", MULTIPART_BOUNDARY).as_bytes());
    body
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl DriveClient for GoogleDrive {
    fn list_children(&self, parent_id: &str, query: &ChildQuery) -> Result<Vec<DriveItem>> {
        let q = build_child_query(parent_id, query);
        let fields = format!("nextPageToken,files({})", FILE_FIELDS);
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            debug!(parent_id, q = %q, "listing drive children");
            let mut request = self
                .agent
                .get(&format!("{}/files", DRIVE_API))
                .header("Authorization", self.bearer.as_str())
                .query("q", &q)
                .query("fields", &fields)
                .query("pageSize", PAGE_SIZE)
                .query("supportsAllDrives", "true")
                .query("includeItemsFromAllDrives", "true");
            if let Some(token) = &page_token {
                request = request.query("pageToken", token);
            }

            let page: FileList = request
                .call()
                .map_err(|e| CrmError::http("list_children", e))?
                .body_mut()
                .read_json()
                .map_err(|e| CrmError::http("list_children", e))?;

            page_token = merge_page(&mut items, page);
            if page_token.is_none() {
                break;
            }
        }

        Ok(items)
    }

    fn get_item(&self, id: &str) -> Result<Option<DriveItem>> {
        let response = self
            .agent
            .get(&Self::file_url(id))
            .header("Authorization", self.bearer.as_str())
            .query("fields", FILE_FIELDS)
            .query("supportsAllDrives", "true")
            .call();

        let mut response = match response {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(404)) => return Ok(None),
            Err(e) => return Err(CrmError::http("get_item", e)),
        };
        let file: FileResource = response
            .body_mut()
            .read_json()
            .map_err(|e| CrmError::http("get_item", e))?;
        Ok(Some(file.into()))
    }

    fn create_folder(&self, parent_id: &str, name: &str) -> Result<DriveItem> {
        debug!(parent_id, name, "creating folder");
        let metadata = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME,
            "parents": [parent_id],
        });
        self.create_metadata("create_folder", &metadata)
    }

    fn create_file(
        &self,
        parent_id: &str,
        name: &str,
        mime_type: &str,
        content: &[u8],
    ) -> Result<DriveItem> {
        debug!(parent_id, name, bytes = content.len(), "uploading file");
        let metadata = serde_json::json!({
            "name": name,
            "mimeType": mime_type,
            "parents": [parent_id],
        });
        let body = multipart_body(&metadata, mime_type, content);
        let file: FileResource = self
            .agent
            .post(&format!("{}/files", UPLOAD_API))
            .header("Authorization", self.bearer.as_str())
            .header(
                "Content-Type",
                format!("multipart/related; boundary={}", MULTIPART_BOUNDARY),
            )
            .query("uploadType", "multipart")
            .query("fields", FILE_FIELDS)
            .query("supportsAllDrives", "true")
            .send(&body[..])
            .map_err(|e| CrmError::http("create_file", e))?
            .body_mut()
            .read_json()
            .map_err(|e| CrmError::http("create_file", e))?;
        Ok(file.into())
    }

    fn update_file(&self, file_id: &str, content: &[u8]) -> Result<()> {
        debug!(file_id, bytes = content.len(), "replacing file content");
        self.agent
            .patch(&format!(
                "{}/files/{}",
                UPLOAD_API,
                urlencoding::encode(file_id)
            ))
            .header("Authorization", self.bearer.as_str())
            .query("uploadType", "media")
            .query("supportsAllDrives", "true")
            .send(content)
            .map_err(|e| CrmError::http("update_file", e))?;
        Ok(())
    }

    fn download_file(&self, file_id: &str) -> Result<Vec<u8>> {
        self.agent
            .get(&Self::file_url(file_id))
            .header("Authorization", self.bearer.as_str())
            .query("alt", "media")
            .query("supportsAllDrives", "true")
            .call()
            .map_err(|e| CrmError::http("download_file", e))?
            .body_mut()
            .read_to_vec()
            .map_err(|e| CrmError::http("download_file", e))
    }

    fn move_item(&self, item_id: &str, from_parent: &str, to_parent: &str) -> Result<()> {
        debug!(item_id, from_parent, to_parent, "moving item");
        self.agent
            .patch(&Self::file_url(item_id))
            .header("Authorization", self.bearer.as_str())
            .query("addParents", to_parent)
            .query("removeParents", from_parent)
            .query("supportsAllDrives", "true")
            .send_json(serde_json::json!({}))
            .map_err(|e| CrmError::http("move_item", e))?;
        Ok(())
    }

    fn trash_item(&self, item_id: &str) -> Result<()> {
        debug!(item_id, "trashing item");
        self.agent
            .patch(&Self::file_url(item_id))
            .header("Authorization", self.bearer.as_str())
            .query("supportsAllDrives", "true")
            .send_json(serde_json::json!({ "trashed": true }))
            .map_err(|e| CrmError::http("trash_item", e))?;
        Ok(())
    }

    fn create_spreadsheet(
        &self,
        parent_id: &str,
        title: &str,
        sheet_title: &str,
    ) -> Result<DriveItem> {
        let metadata = serde_json::json!({
            "name": title,
            "mimeType": SPREADSHEET_MIME,
            "parents": [parent_id],
        });
        let item = self.create_metadata("create_spreadsheet", &metadata)?;

        // New spreadsheets start with "Sheet1" (sheetId 0); rename it.
        let rename = serde_json::json!({
            "requests": [{
                "updateSheetProperties": {
                    "properties": { "sheetId": 0, "title": sheet_title },
                    "fields": "title",
                }
            }]
        });
        self.agent
            .post(&format!(
                "{}/spreadsheets/{}:batchUpdate",
                SHEETS_API,
                urlencoding::encode(&item.id)
            ))
            .header("Authorization", self.bearer.as_str())
            .send_json(&rename)
            .map_err(|e| CrmError::http("create_spreadsheet", e))?;
        Ok(item)
    }

    fn read_range(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        debug!(spreadsheet_id, range, "reading range");
        let values: ValueRange = self
            .agent
            .get(&Self::values_url(spreadsheet_id, range))
            .header("Authorization", self.bearer.as_str())
            .query("majorDimension", "ROWS")
            .call()
            .map_err(|e| CrmError::http("read_range", e))?
            .body_mut()
            .read_json()
            .map_err(|e| CrmError::http("read_range", e))?;
        Ok(values
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    fn update_range(&self, spreadsheet_id: &str, range: &str, rows: &[Vec<String>]) -> Result<()> {
        debug!(spreadsheet_id, range, rows = rows.len(), "updating range");
        let body = serde_json::json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": rows,
        });
        self.agent
            .put(&Self::values_url(spreadsheet_id, range))
            .header("Authorization", self.bearer.as_str())
            .query("valueInputOption", "RAW")
            .send_json(&body)
            .map_err(|e| CrmError::http("update_range", e))?;
        Ok(())
    }

    fn append_rows(&self, spreadsheet_id: &str, range: &str, rows: &[Vec<String>]) -> Result<()> {
        debug!(spreadsheet_id, range, rows = rows.len(), "appending rows");
        let body = serde_json::json!({
            "majorDimension": "ROWS",
            "values": rows,
        });
        self.agent
            .post(&format!("{}:append", Self::values_url(spreadsheet_id, range)))
            .header("Authorization", self.bearer.as_str())
            .query("valueInputOption", "RAW")
            .query("insertDataOption", "INSERT_ROWS")
            .send_json(&body)
            .map_err(|e| CrmError::http("append_rows", e))?;
        Ok(())
    }
}
