//! Séries do dashboard calculadas sobre a coleção de clientes do usuário
//!
//! Todas as funções são puras: recebem os clientes já carregados e nunca
//! falham. Valores ilegíveis contam como zero, datas ilegíveis ficam de fora.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::models::status::{emblema_status_cliente, Emblema, StatusCliente};
use crate::models::Cliente;
use crate::utils::currency::format_currency;
use crate::utils::logging::log_unknown_status;

pub const MESES: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Quantidade padrão do ranking de clientes
pub const TOP_N_PADRAO: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PontoMensal {
    pub mes: &'static str,
    pub numero: u32,
    pub valor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FatiaPipeline {
    pub status: String,
    pub emblema: Emblema,
    pub quantidade: usize,
    pub valor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClienteValor {
    pub id: Uuid,
    pub nome: String,
    pub empresa: String,
    pub valor: f64,
    pub valor_formatado: String,
}

/// Cartões do topo do dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumoDashboard {
    /// Soma dos negócios em aberto
    pub projecao_ganhos: f64,
    pub projecao_ganhos_formatada: String,
    pub contratos_fechados: usize,
    pub clientes_ativos: usize,
    pub receita_mes_atual: f64,
    pub receita_mes_anterior: f64,
    /// Variação percentual em relação ao mês anterior; `None` sem receita anterior
    pub variacao_mensal: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub ano: i32,
    pub resumo: ResumoDashboard,
    pub receita_mensal: Vec<PontoMensal>,
    pub pipeline: Vec<FatiaPipeline>,
    pub top_clientes: Vec<ClienteValor>,
}

fn is_fechado(cliente: &Cliente) -> bool {
    cliente.status_conhecido() == Some(StatusCliente::Fechado)
}

/// Receita fechada por mês do ano: sempre 12 pontos, Jan a Dez
pub fn receita_mensal(clientes: &[Cliente], ano: i32) -> Vec<PontoMensal> {
    let mut valores = [0.0_f64; 12];

    for cliente in clientes.iter().filter(|c| is_fechado(c)) {
        if let Some(data) = cliente.fechado_em() {
            if data.year() == ano {
                valores[data.month0() as usize] += cliente.valor();
            }
        }
    }

    MESES
        .into_iter()
        .zip(valores)
        .enumerate()
        .map(|(i, (mes, valor))| PontoMensal {
            mes,
            numero: i as u32 + 1,
            valor,
        })
        .collect()
}

fn receita_no_mes(clientes: &[Cliente], ano: i32, mes: u32) -> f64 {
    clientes
        .iter()
        .filter(|c| is_fechado(c))
        .filter(|c| {
            c.fechado_em()
                .map_or(false, |d| d.year() == ano && d.month() == mes)
        })
        .map(Cliente::valor)
        .sum()
}

/// Quantidade e valor por status
///
/// Os sete status conhecidos aparecem sempre, na ordem do pipeline, mesmo
/// zerados. Status desconhecidos vêm depois, na ordem em que aparecem.
pub fn distribuicao_pipeline(clientes: &[Cliente]) -> Vec<FatiaPipeline> {
    let mut fatias: Vec<FatiaPipeline> = StatusCliente::TODOS
        .iter()
        .map(|status| FatiaPipeline {
            status: status.as_str().to_string(),
            emblema: status.emblema(),
            quantidade: 0,
            valor: 0.0,
        })
        .collect();

    for cliente in clientes {
        let posicao = match fatias.iter().position(|f| f.status == cliente.status) {
            Some(posicao) => posicao,
            None => {
                log_unknown_status("cliente", &cliente.status);
                fatias.push(FatiaPipeline {
                    status: cliente.status.clone(),
                    emblema: emblema_status_cliente(&cliente.status),
                    quantidade: 0,
                    valor: 0.0,
                });
                fatias.len() - 1
            }
        };

        fatias[posicao].quantidade += 1;
        fatias[posicao].valor += cliente.valor();
    }

    fatias
}

/// Maiores valores estimados, sem repetir cliente e sem valores zerados
///
/// Empates mantêm a ordem original.
pub fn top_clientes(clientes: &[Cliente], n: usize) -> Vec<ClienteValor> {
    let mut vistos = HashSet::new();

    let mut ranking: Vec<ClienteValor> = clientes
        .iter()
        .filter(|c| vistos.insert(c.id))
        .map(|c| ClienteValor {
            id: c.id,
            nome: c.nome.clone(),
            empresa: c.empresa.clone(),
            valor: c.valor(),
            valor_formatado: String::new(),
        })
        .filter(|c| c.valor > 0.0)
        .collect();

    ranking.sort_by(|a, b| b.valor.total_cmp(&a.valor));
    ranking.truncate(n);

    for item in &mut ranking {
        item.valor_formatado = format_currency(item.valor);
    }
    ranking
}

pub fn resumo(clientes: &[Cliente], hoje: NaiveDate) -> ResumoDashboard {
    let projecao_ganhos: f64 = clientes
        .iter()
        .filter(|c| c.status_conhecido().map_or(true, |s| s.is_em_aberto()))
        .map(Cliente::valor)
        .sum();

    let contratos_fechados = clientes.iter().filter(|c| is_fechado(c)).count();
    let clientes_ativos = clientes
        .iter()
        .filter(|c| c.status_conhecido().map_or(true, |s| s.is_ativo()))
        .count();

    let (ano_anterior, mes_anterior) = if hoje.month() == 1 {
        (hoje.year() - 1, 12)
    } else {
        (hoje.year(), hoje.month() - 1)
    };

    let receita_mes_atual = receita_no_mes(clientes, hoje.year(), hoje.month());
    let receita_mes_anterior = receita_no_mes(clientes, ano_anterior, mes_anterior);
    let variacao_mensal = (receita_mes_anterior > 0.0)
        .then(|| (receita_mes_atual - receita_mes_anterior) / receita_mes_anterior * 100.0);

    ResumoDashboard {
        projecao_ganhos,
        projecao_ganhos_formatada: format_currency(projecao_ganhos),
        contratos_fechados,
        clientes_ativos,
        receita_mes_atual,
        receita_mes_anterior,
        variacao_mensal,
    }
}

pub fn montar_dashboard(clientes: &[Cliente], ano: i32, hoje: NaiveDate, top_n: usize) -> Dashboard {
    Dashboard {
        ano,
        resumo: resumo(clientes, hoje),
        receita_mensal: receita_mensal(clientes, ano),
        pipeline: distribuicao_pipeline(clientes),
        top_clientes: top_clientes(clientes, top_n),
    }
}
