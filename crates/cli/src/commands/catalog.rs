//! Backend selection and catalog listing.

use santafe_client::{AppError, AppState};
use santafe_core::CategoryId;

/// Probe every candidate, then select the active one.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
#[allow(clippy::print_stdout)]
pub async fn probe(state: &AppState) -> Result<(), AppError> {
    let resolver = state.api().resolver();

    for url in resolver.endpoints().iter() {
        let status = if resolver.probe(url).await {
            "ok"
        } else {
            "indisponível"
        };
        println!("{url}  {status}");
    }

    let active = resolver.select_initial().await;
    println!("Ativo: {active}");
    Ok(())
}

/// List products, optionally only those of one category.
///
/// # Errors
///
/// Returns an error if the backend cannot be reached or rejects the call.
#[allow(clippy::print_stdout)]
pub async fn products(state: &AppState, categoria: Option<&str>) -> Result<(), AppError> {
    super::connect(state).await;

    let api = state.api();
    let produtos = match categoria {
        Some(id) => api
            .produtos_by_categoria(&CategoryId::new(id))
            .await?
            .into_result()?,
        None => api.produtos().await?.into_result()?.to_vec(),
    };

    for produto in &produtos {
        let categoria = produto.categoria.as_ref().map_or("-", |c| c.nome.as_str());
        println!(
            "{:>6}  {:<40}  {:>12}  {}",
            produto.id.to_string(),
            produto.nome,
            produto.price().display(),
            categoria
        );
    }
    println!("{} produto(s)", produtos.len());
    Ok(())
}

/// List categories.
///
/// # Errors
///
/// Returns an error if the backend cannot be reached or rejects the call.
#[allow(clippy::print_stdout)]
pub async fn categories(state: &AppState) -> Result<(), AppError> {
    super::connect(state).await;

    let categorias = state.api().categorias().await?.into_result()?;

    for categoria in categorias.iter() {
        match &categoria.descricao {
            Some(descricao) => println!("{:<12}  {}  ({descricao})", categoria.id.to_string(), categoria.nome),
            None => println!("{:<12}  {}", categoria.id.to_string(), categoria.nome),
        }
    }
    Ok(())
}
