// src/services/document_service.rs

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InventoryRepository, MaterialRepository, SiteRepository},
    middleware::i18n::Locale,
    models::inventory::StockDirection,
};

// Os rótulos do PDF nos dois idiomas que o app fala
struct SlipLabels {
    delivery_title: &'static str,
    issue_title: &'static str,
    slip_no: &'static str,
    date: &'static str,
    material: &'static str,
    subtype: &'static str,
    quantity: &'static str,
    rate: &'static str,
    amount: &'static str,
    supplier: &'static str,
    contractor: &'static str,
    vehicle: &'static str,
    notes: &'static str,
    verify: &'static str,
}

fn labels_for(locale: &Locale) -> SlipLabels {
    if locale.0 == "pt" {
        SlipLabels {
            delivery_title: "NOTA DE ENTREGA",
            issue_title: "GUIA DE SAÍDA",
            slip_no: "Guia nº",
            date: "Data",
            material: "Material",
            subtype: "Subtipo",
            quantity: "Quantidade",
            rate: "Preço unitário",
            amount: "Total",
            supplier: "Fornecedor",
            contractor: "Empreiteiro",
            vehicle: "Veículo",
            notes: "Observações",
            verify: "Confira esta guia na portaria pelo QR Code",
        }
    } else {
        SlipLabels {
            delivery_title: "DELIVERY NOTE",
            issue_title: "ISSUE SLIP",
            slip_no: "Slip no.",
            date: "Date",
            material: "Material",
            subtype: "Subtype",
            quantity: "Quantity",
            rate: "Unit rate",
            amount: "Amount",
            supplier: "Supplier",
            contractor: "Contractor",
            vehicle: "Vehicle",
            notes: "Notes",
            verify: "Verify this slip at the gate with the QR code",
        }
    }
}

#[derive(Clone)]
pub struct DocumentService {
    inventory_repo: InventoryRepository,
    site_repo: SiteRepository,
    material_repo: MaterialRepository,
}

impl DocumentService {
    pub fn new(
        inventory_repo: InventoryRepository,
        site_repo: SiteRepository,
        material_repo: MaterialRepository,
    ) -> Self {
        Self { inventory_repo, site_repo, material_repo }
    }

    pub async fn generate_transaction_slip(
        &self,
        site_id: Uuid,
        transaction_id: Uuid,
        locale: &Locale,
    ) -> Result<Vec<u8>, AppError> {
        // 1. Busca os Dados
        let movement = self.inventory_repo
            .find_transaction(site_id, transaction_id)
            .await?
            .ok_or(AppError::TransactionNotFound)?;

        let site = self.site_repo
            .find_site_by_id(site_id)
            .await?
            .ok_or(AppError::SiteNotFound)?;

        let material = self.material_repo
            .find_material_by_id(movement.material_id)
            .await?
            .ok_or(AppError::MaterialNotFound)?;

        let labels = labels_for(locale);

        // 2. Configura o PDF
        // Carrega a fonte da pasta 'fonts/'
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None)
            .map_err(|_| AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("{} {}", labels.slip_no, movement.id));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO DA OBRA ---
        doc.push(
            elements::Paragraph::new(site.name.clone())
                .styled(style::Style::new().bold().with_font_size(18)),
        );
        doc.push(
            elements::Paragraph::new(format!("({})", site.code))
                .styled(style::Style::new().with_font_size(10)),
        );

        doc.push(elements::Break::new(1.5));

        let title = match movement.direction {
            StockDirection::Inward => labels.delivery_title,
            StockDirection::Outward => labels.issue_title,
        };
        doc.push(
            elements::Paragraph::new(title)
                .styled(style::Style::new().bold().with_font_size(14)),
        );

        // Número curto da guia (os 8 primeiros dígitos do UUID bastam no papel)
        let short_id = movement.id.to_string()[..8].to_uppercase();
        doc.push(elements::Paragraph::new(format!("{} {}", labels.slip_no, short_id)));

        let slip_date = movement
            .occurred_on
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| movement.created_at.format("%d/%m/%Y").to_string());
        doc.push(elements::Paragraph::new(format!("{}: {}", labels.date, slip_date)));

        doc.push(elements::Break::new(2));

        // --- TABELA DA MOVIMENTAÇÃO ---
        // Pesos das colunas: Rótulo (2), Valor (3)
        let mut table = elements::TableLayout::new(vec![2, 3]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();

        let mut push_row = |label: &str, value: String| {
            table
                .row()
                .element(elements::Paragraph::new(label).styled(style_bold))
                .element(elements::Paragraph::new(value))
                .push()
                .expect("Table row error");
        };

        push_row(labels.material, material.name.clone());
        push_row(labels.subtype, movement.variant.clone());
        push_row(
            labels.quantity,
            format!("{} {}", movement.quantity, material.unit_symbol),
        );

        if let Some(rate) = movement.unit_rate {
            push_row(labels.rate, format!("R$ {:.2}", rate));
            push_row(labels.amount, format!("R$ {:.2}", movement.quantity * rate));
        }

        let counterparty_label = match movement.direction {
            StockDirection::Inward => labels.supplier,
            StockDirection::Outward => labels.contractor,
        };
        push_row(counterparty_label, movement.counterparty.clone());

        if let Some(vehicle) = &movement.vehicle_number {
            push_row(labels.vehicle, vehicle.clone());
        }

        if let Some(notes) = &movement.notes {
            push_row(labels.notes, notes.clone());
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- QR CODE DE CONFERÊNCIA ---
        // O QR carrega o UUID completo; a portaria consulta a movimentação
        let code = QrCode::new(movement.id.to_string().as_bytes())
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        // Renderiza para imagem
        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

        // Converte para genpdf::Image
        let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
            .with_scale(genpdf::Scale::new(0.5, 0.5));

        doc.push(pdf_image);
        doc.push(
            elements::Paragraph::new(labels.verify)
                .styled(style::Style::new().with_font_size(8)),
        );

        // --- RODAPÉ ---
        if let Some(addr) = site.address {
            doc.push(elements::Break::new(2));
            doc.push(
                elements::Paragraph::new(addr)
                    .styled(style::Style::new().italic().with_font_size(8)),
            );
        }

        // 3. Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}
