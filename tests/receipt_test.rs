mod common;

use anyhow::Result;
use common::{item, test_service, Roster};
use fiado::domain::{format_cents, PaymentMethod};
use fiado::io::{render_receipt, DEFAULT_MARKET_NAME};

#[tokio::test]
async fn test_receipt_projects_registered_sale() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let maria = Roster::maria(&service).await?;

    let result = service
        .register_sale(maria.id, vec![item("Arroz 5kg", 3000)], PaymentMethod::Cash)
        .await?;

    let receipt = render_receipt(&result.sale, &result.customer, DEFAULT_MARKET_NAME);

    assert!(receipt.contains("MERCADO DO ZE"));
    assert!(receipt.contains("COMPROVANTE DE COMPRA FIADO"));
    assert!(receipt.contains("Maria"));
    assert!(receipt.contains("Arroz 5kg"));
    assert!(receipt.contains("R$ 30.00")); // total
    assert!(receipt.contains("R$ 80.00")); // prior debt
    assert!(receipt.contains("R$ 110.00")); // new debt
    assert!(receipt.contains("R$ 100.00")); // limit
    assert!(receipt.contains("ASSINATURA DO CLIENTE"));

    Ok(())
}

#[tokio::test]
async fn test_receipt_itemizes_multi_line_sales() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let joao = Roster::joao(&service).await?;

    let result = service
        .register_sale(
            joao.id,
            vec![
                item("Cafe 500g", 1200),
                item("Acucar 1kg", 600),
                item("Pao frances", 150),
            ],
            PaymentMethod::Transfer,
        )
        .await?;

    let receipt = render_receipt(&result.sale, &result.customer, "ARMAZEM CENTRAL");

    assert!(receipt.contains("ARMAZEM CENTRAL"));
    for sale_item in &result.sale.items {
        assert!(receipt.contains(&sale_item.product));
        assert!(receipt.contains(&format!("R$ {}", format_cents(sale_item.value_cents))));
    }
    assert!(receipt.contains("R$ 19.50"));

    Ok(())
}

#[tokio::test]
async fn test_reprint_matches_original_projection() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let maria = Roster::maria(&service).await?;

    let result = service
        .register_sale(maria.id, vec![item("Feijao", 900)], PaymentMethod::Card)
        .await?;
    let original = render_receipt(&result.sale, &result.customer, DEFAULT_MARKET_NAME);

    // Reprint from storage while the debt is unchanged
    let (sale, customer) = service.get_sale(result.sale.id).await?;
    let reprint = render_receipt(&sale, &customer, DEFAULT_MARKET_NAME);

    assert_eq!(original, reprint);

    Ok(())
}
