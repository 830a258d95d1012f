use crate::Candidate;

/// Output formats offered by the results view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Backend-rendered spreadsheet.
    Spreadsheet,
    /// Backend-rendered document.
    Document,
    /// Comma-separated text built locally.
    Csv,
}

impl ExportFormat {
    /// Value of the `format` field sent to the export endpoint.
    pub fn wire_name(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::Document => "pdf",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn file_extension(self) -> &'static str {
        self.wire_name()
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Document => "application/pdf",
            ExportFormat::Csv => "text/csv",
        }
    }

    pub fn is_backend_rendered(self) -> bool {
        !matches!(self, ExportFormat::Csv)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Export {
        format: ExportFormat,
        job_description: String,
        candidates: Vec<Candidate>,
    },
}
