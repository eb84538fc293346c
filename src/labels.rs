//! Static label table: six languages, one set per document type.
//!
//! The table is read-only. Callers receive an owned copy so that per-field
//! overrides stay local to the document they were made on.

use crate::model::{DocumentType, Locale, TemplateLabels};

struct LabelSet {
    document_title: &'static str,
    document_number_label: &'static str,
    date_label: &'static str,
    due_date_label: &'static str,
    from_label: &'static str,
    to_label: &'static str,
    description_label: &'static str,
    quantity_label: &'static str,
    rate_label: &'static str,
    amount_label: &'static str,
    subtotal_label: &'static str,
    tax_label: &'static str,
    total_label: &'static str,
    notes_label: &'static str,
    terms_label: &'static str,
    notes_placeholder: &'static str,
    terms_placeholder: &'static str,
    footer_label: &'static str,
    footer_placeholder: &'static str,
}

impl LabelSet {
    fn to_labels(&self) -> TemplateLabels {
        TemplateLabels {
            document_title: self.document_title.to_string(),
            document_number_label: self.document_number_label.to_string(),
            date_label: self.date_label.to_string(),
            due_date_label: self.due_date_label.to_string(),
            from_label: self.from_label.to_string(),
            to_label: self.to_label.to_string(),
            description_label: self.description_label.to_string(),
            quantity_label: self.quantity_label.to_string(),
            rate_label: self.rate_label.to_string(),
            amount_label: self.amount_label.to_string(),
            subtotal_label: self.subtotal_label.to_string(),
            tax_label: self.tax_label.to_string(),
            total_label: self.total_label.to_string(),
            notes_label: self.notes_label.to_string(),
            terms_label: self.terms_label.to_string(),
            notes_placeholder: self.notes_placeholder.to_string(),
            terms_placeholder: self.terms_placeholder.to_string(),
            footer_label: self.footer_label.to_string(),
            footer_placeholder: self.footer_placeholder.to_string(),
        }
    }
}

/// Labels for `document_type` in `locale`.
pub fn resolve(locale: Locale, document_type: DocumentType) -> TemplateLabels {
    label_set(locale, document_type).to_labels()
}

fn label_set(locale: Locale, document_type: DocumentType) -> &'static LabelSet {
    use DocumentType::{Invoice, PurchaseOrder};

    match (locale, document_type) {
        (Locale::En, Invoice) => &EN_INVOICE,
        (Locale::En, PurchaseOrder) => &EN_PURCHASE_ORDER,
        (Locale::Fr, Invoice) => &FR_INVOICE,
        (Locale::Fr, PurchaseOrder) => &FR_PURCHASE_ORDER,
        (Locale::Es, Invoice) => &ES_INVOICE,
        (Locale::Es, PurchaseOrder) => &ES_PURCHASE_ORDER,
        (Locale::De, Invoice) => &DE_INVOICE,
        (Locale::De, PurchaseOrder) => &DE_PURCHASE_ORDER,
        (Locale::It, Invoice) => &IT_INVOICE,
        (Locale::It, PurchaseOrder) => &IT_PURCHASE_ORDER,
        (Locale::Pt, Invoice) => &PT_INVOICE,
        (Locale::Pt, PurchaseOrder) => &PT_PURCHASE_ORDER,
    }
}

static EN_INVOICE: LabelSet = LabelSet {
    document_title: "INVOICE",
    document_number_label: "Invoice Number",
    date_label: "Date",
    due_date_label: "Due Date",
    from_label: "FROM",
    to_label: "BILL TO",
    description_label: "Description",
    quantity_label: "Quantity",
    rate_label: "Rate",
    amount_label: "Amount",
    subtotal_label: "Subtotal",
    tax_label: "Tax",
    total_label: "Total",
    notes_label: "Notes",
    terms_label: "Terms & Conditions",
    notes_placeholder: "Thank you for your business!",
    terms_placeholder: "Payment is due within 30 days.",
    footer_label: "Footer",
    footer_placeholder: "Company Name | Address | Phone | Email",
};

static EN_PURCHASE_ORDER: LabelSet = LabelSet {
    document_title: "PURCHASE ORDER",
    document_number_label: "PO Number",
    date_label: "Date",
    due_date_label: "Delivery Date",
    from_label: "BUYER",
    to_label: "VENDOR",
    description_label: "Description",
    quantity_label: "Quantity",
    rate_label: "Unit Price",
    amount_label: "Total",
    subtotal_label: "Subtotal",
    tax_label: "Tax",
    total_label: "Total Amount",
    notes_label: "Special Instructions",
    terms_label: "Terms & Conditions",
    notes_placeholder: "Please deliver to the address specified above.",
    terms_placeholder: "All items must be delivered by the specified delivery date.",
    footer_label: "Footer",
    footer_placeholder: "Company Name | Address | Phone | Email",
};

static FR_INVOICE: LabelSet = LabelSet {
    document_title: "FACTURE",
    document_number_label: "Numéro de facture",
    date_label: "Date",
    due_date_label: "Date d'échéance",
    from_label: "DE",
    to_label: "FACTURER À",
    description_label: "Désignation",
    quantity_label: "Qté",
    rate_label: "P.U. HT",
    amount_label: "Total HT",
    subtotal_label: "Sous-total",
    tax_label: "TVA",
    total_label: "Total TTC",
    notes_label: "Notes",
    terms_label: "Conditions",
    notes_placeholder: "Merci pour votre confiance!",
    terms_placeholder: "Paiement sous 30 jours.",
    footer_label: "Pied de page",
    footer_placeholder: "Nom de l'entreprise | Adresse | Téléphone | Email",
};

static FR_PURCHASE_ORDER: LabelSet = LabelSet {
    document_title: "BON DE COMMANDE",
    document_number_label: "Numéro BC",
    date_label: "Date",
    due_date_label: "Date de livraison",
    from_label: "ACHETEUR",
    to_label: "FOURNISSEUR",
    description_label: "Désignation",
    quantity_label: "Qté",
    rate_label: "Prix unitaire",
    amount_label: "Total",
    subtotal_label: "Sous-total",
    tax_label: "TVA",
    total_label: "Montant total",
    notes_label: "Instructions",
    terms_label: "Conditions",
    notes_placeholder: "Veuillez livrer à l'adresse indiquée.",
    terms_placeholder: "Tous les articles doivent être livrés à la date spécifiée.",
    footer_label: "Pied de page",
    footer_placeholder: "Nom de l'entreprise | Adresse | Téléphone | Email",
};

static ES_INVOICE: LabelSet = LabelSet {
    document_title: "FACTURA",
    document_number_label: "Número de factura",
    date_label: "Fecha",
    due_date_label: "Fecha de vencimiento",
    from_label: "DE",
    to_label: "FACTURAR A",
    description_label: "Descripción",
    quantity_label: "Cantidad",
    rate_label: "Precio",
    amount_label: "Importe",
    subtotal_label: "Subtotal",
    tax_label: "IVA",
    total_label: "Total",
    notes_label: "Notas",
    terms_label: "Términos y condiciones",
    notes_placeholder: "¡Gracias por su negocio!",
    terms_placeholder: "El pago vence en 30 días.",
    footer_label: "Pie de página",
    footer_placeholder: "Nombre de la empresa | Dirección | Teléfono | Email",
};

static ES_PURCHASE_ORDER: LabelSet = LabelSet {
    document_title: "ORDEN DE COMPRA",
    document_number_label: "Número OC",
    date_label: "Fecha",
    due_date_label: "Fecha de entrega",
    from_label: "COMPRADOR",
    to_label: "PROVEEDOR",
    description_label: "Descripción",
    quantity_label: "Cantidad",
    rate_label: "Precio unitario",
    amount_label: "Total",
    subtotal_label: "Subtotal",
    tax_label: "IVA",
    total_label: "Importe total",
    notes_label: "Instrucciones",
    terms_label: "Términos y condiciones",
    notes_placeholder: "Por favor entregar en la dirección especificada.",
    terms_placeholder: "Todos los artículos deben entregarse en la fecha especificada.",
    footer_label: "Pie de página",
    footer_placeholder: "Nombre de la empresa | Dirección | Teléfono | Email",
};

static DE_INVOICE: LabelSet = LabelSet {
    document_title: "RECHNUNG",
    document_number_label: "Rechnungsnummer",
    date_label: "Datum",
    due_date_label: "Fälligkeitsdatum",
    from_label: "VON",
    to_label: "RECHNUNG AN",
    description_label: "Beschreibung",
    quantity_label: "Menge",
    rate_label: "Preis",
    amount_label: "Betrag",
    subtotal_label: "Zwischensumme",
    tax_label: "MwSt",
    total_label: "Gesamt",
    notes_label: "Notizen",
    terms_label: "Geschäftsbedingungen",
    notes_placeholder: "Vielen Dank für Ihr Geschäft!",
    terms_placeholder: "Zahlung fällig innerhalb von 30 Tagen.",
    footer_label: "Fußzeile",
    footer_placeholder: "Firmenname | Adresse | Telefon | E-Mail",
};

static DE_PURCHASE_ORDER: LabelSet = LabelSet {
    document_title: "BESTELLUNG",
    document_number_label: "Bestellnummer",
    date_label: "Datum",
    due_date_label: "Lieferdatum",
    from_label: "KÄUFER",
    to_label: "LIEFERANT",
    description_label: "Beschreibung",
    quantity_label: "Menge",
    rate_label: "Stückpreis",
    amount_label: "Gesamt",
    subtotal_label: "Zwischensumme",
    tax_label: "MwSt",
    total_label: "Gesamtbetrag",
    notes_label: "Anweisungen",
    terms_label: "Geschäftsbedingungen",
    notes_placeholder: "Bitte an die angegebene Adresse liefern.",
    terms_placeholder: "Alle Artikel müssen bis zum angegebenen Datum geliefert werden.",
    footer_label: "Fußzeile",
    footer_placeholder: "Firmenname | Adresse | Telefon | E-Mail",
};

static IT_INVOICE: LabelSet = LabelSet {
    document_title: "FATTURA",
    document_number_label: "Numero fattura",
    date_label: "Data",
    due_date_label: "Data di scadenza",
    from_label: "DA",
    to_label: "FATTURARE A",
    description_label: "Descrizione",
    quantity_label: "Quantità",
    rate_label: "Prezzo",
    amount_label: "Importo",
    subtotal_label: "Subtotale",
    tax_label: "IVA",
    total_label: "Totale",
    notes_label: "Note",
    terms_label: "Termini e condizioni",
    notes_placeholder: "Grazie per il vostro business!",
    terms_placeholder: "Il pagamento è dovuto entro 30 giorni.",
    footer_label: "Piè di pagina",
    footer_placeholder: "Nome azienda | Indirizzo | Telefono | Email",
};

static IT_PURCHASE_ORDER: LabelSet = LabelSet {
    document_title: "ORDINE DI ACQUISTO",
    document_number_label: "Numero OA",
    date_label: "Data",
    due_date_label: "Data di consegna",
    from_label: "ACQUIRENTE",
    to_label: "FORNITORE",
    description_label: "Descrizione",
    quantity_label: "Quantità",
    rate_label: "Prezzo unitario",
    amount_label: "Totale",
    subtotal_label: "Subtotale",
    tax_label: "IVA",
    total_label: "Importo totale",
    notes_label: "Istruzioni",
    terms_label: "Termini e condizioni",
    notes_placeholder: "Si prega di consegnare all'indirizzo specificato.",
    terms_placeholder: "Tutti gli articoli devono essere consegnati entro la data specificata.",
    footer_label: "Piè di pagina",
    footer_placeholder: "Nome azienda | Indirizzo | Telefono | Email",
};

static PT_INVOICE: LabelSet = LabelSet {
    document_title: "FATURA",
    document_number_label: "Número da fatura",
    date_label: "Data",
    due_date_label: "Data de vencimento",
    from_label: "DE",
    to_label: "FATURAR PARA",
    description_label: "Descrição",
    quantity_label: "Quantidade",
    rate_label: "Preço",
    amount_label: "Valor",
    subtotal_label: "Subtotal",
    tax_label: "IVA",
    total_label: "Total",
    notes_label: "Notas",
    terms_label: "Termos e condições",
    notes_placeholder: "Obrigado pelo seu negócio!",
    terms_placeholder: "O pagamento é devido em 30 dias.",
    footer_label: "Rodapé",
    footer_placeholder: "Nome da empresa | Endereço | Telefone | Email",
};

static PT_PURCHASE_ORDER: LabelSet = LabelSet {
    document_title: "ORDEM DE COMPRA",
    document_number_label: "Número OC",
    date_label: "Data",
    due_date_label: "Data de entrega",
    from_label: "COMPRADOR",
    to_label: "FORNECEDOR",
    description_label: "Descrição",
    quantity_label: "Quantidade",
    rate_label: "Preço unitário",
    amount_label: "Total",
    subtotal_label: "Subtotal",
    tax_label: "IVA",
    total_label: "Valor total",
    notes_label: "Instruções",
    terms_label: "Termos e condições",
    notes_placeholder: "Por favor, entregar no endereço especificado.",
    terms_placeholder: "Todos os itens devem ser entregues na data especificada.",
    footer_label: "Rodapé",
    footer_placeholder: "Nome da empresa | Endereço | Telefone | Email",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_invoice_labels() {
        let labels = resolve(Locale::En, DocumentType::Invoice);
        assert_eq!(labels.document_title, "INVOICE");
        assert_eq!(labels.to_label, "BILL TO");
        assert_eq!(labels.terms_placeholder, "Payment is due within 30 days.");
    }

    #[test]
    fn test_purchase_order_labels() {
        let labels = resolve(Locale::En, DocumentType::PurchaseOrder);
        assert_eq!(labels.document_title, "PURCHASE ORDER");
        assert_eq!(labels.document_number_label, "PO Number");
        assert_eq!(labels.due_date_label, "Delivery Date");

        let labels = resolve(Locale::Fr, DocumentType::PurchaseOrder);
        assert_eq!(labels.document_title, "BON DE COMMANDE");
    }

    #[test]
    fn test_unsupported_tag_resolves_as_english() {
        for document_type in DocumentType::ALL.iter().copied() {
            assert_eq!(
                resolve(Locale::parse("xx"), document_type),
                resolve(Locale::En, document_type)
            );
        }
        assert_eq!(resolve(Locale::parse("de-AT"), DocumentType::Invoice).tax_label, "MwSt");
    }

    #[test]
    fn test_every_set_is_complete_and_distinct_per_type() {
        for locale in Locale::ALL.iter().copied() {
            let invoice = resolve(locale, DocumentType::Invoice);
            let order = resolve(locale, DocumentType::PurchaseOrder);
            for labels in [&invoice, &order] {
                assert!(!labels.document_title.is_empty());
                assert!(!labels.total_label.is_empty());
                assert!(!labels.footer_placeholder.is_empty());
            }
            assert_ne!(invoice.document_title, order.document_title, "{locale}");
        }
    }

    #[test]
    fn test_resolve_returns_independent_copies() {
        let mut first = resolve(Locale::It, DocumentType::Invoice);
        first.document_title = "CUSTOM".to_string();
        let second = resolve(Locale::It, DocumentType::Invoice);
        assert_eq!(second.document_title, "FATTURA");
    }
}
