//! Template engine setup and HTML templates.

use once_cell::sync::Lazy;
use tera::{Context, Tera};

/// Global template engine instance with embedded templates.
pub static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();

    // Embed templates directly in the binary (no external files needed)
    tera.add_raw_templates(vec![
        ("base.html", BASE_TEMPLATE),
        ("index.html", INDEX_TEMPLATE),
        ("users_list.html", USERS_LIST_TEMPLATE),
        ("user_new.html", USER_NEW_TEMPLATE),
        ("user_edit.html", USER_EDIT_TEMPLATE),
        ("dramas_list.html", DRAMAS_LIST_TEMPLATE),
        ("drama_new.html", DRAMA_NEW_TEMPLATE),
        ("drama_edit.html", DRAMA_EDIT_TEMPLATE),
        ("error.html", ERROR_TEMPLATE),
    ])
    .expect("Failed to load templates");

    tera
});

/// Render a template with context
pub fn render(template: &str, context: &Context) -> Result<String, tera::Error> {
    TEMPLATES.render(template, context)
}

// =============================================================================
// Embedded Templates
// =============================================================================

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}Contador de Dramas{% endblock %}</title>
    <style>
        :root {
            --bg: #0d0d10;
            --bg-card: #16161c;
            --fg: #f2f2f5;
            --fg-muted: rgba(242, 242, 245, 0.6);
            --border: #2a2a33;
            --success: #2f9e68;
            --warning: #c98a1b;
            --danger: #cf4444;
            --info: #3578c2;
        }

        * { box-sizing: border-box; margin: 0; padding: 0; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--fg);
            line-height: 1.6;
        }

        a { color: var(--fg); text-decoration: none; }
        a:hover { opacity: 0.7; }

        .header { border-bottom: 1px solid var(--border); padding: 16px 32px; }
        .header-content {
            max-width: 960px; margin: 0 auto;
            display: flex; align-items: center; justify-content: space-between;
        }
        .logo { font-size: 18px; font-weight: 600; }
        .nav { display: flex; gap: 24px; }
        .nav a { color: var(--fg-muted); font-size: 14px; }
        .nav a:hover { color: var(--fg); opacity: 1; }

        .container { max-width: 960px; margin: 0 auto; padding: 40px 32px; }

        h1 { font-size: 26px; font-weight: 600; margin-bottom: 24px; }

        .alert {
            padding: 10px 16px; border-radius: 6px; margin-bottom: 16px;
            font-size: 14px; border: 1px solid;
        }
        .alert-success { border-color: var(--success); color: var(--success); }
        .alert-warning { border-color: var(--warning); color: var(--warning); }
        .alert-danger  { border-color: var(--danger);  color: var(--danger); }
        .alert-info    { border-color: var(--info);    color: var(--info); }

        table { width: 100%; border-collapse: collapse; font-size: 14px; }
        th, td { text-align: left; padding: 10px 12px; border-bottom: 1px solid var(--border); }
        th { color: var(--fg-muted); font-weight: 500; }

        .card {
            background: var(--bg-card); border: 1px solid var(--border);
            border-radius: 8px; padding: 20px;
        }
        .stat-grid { display: flex; gap: 16px; margin-bottom: 32px; }
        .stat-grid .card { flex: 1; text-align: center; }
        .stat-value { font-size: 28px; font-weight: 600; }
        .stat-label { font-size: 13px; color: var(--fg-muted); }

        form.inline { display: inline; }
        input[type="text"], textarea, select, input[type="number"] {
            background: var(--bg-card); border: 1px solid var(--border);
            color: var(--fg); border-radius: 6px; padding: 8px 10px;
            font-size: 14px; width: 100%;
        }
        label { display: block; font-size: 13px; color: var(--fg-muted); margin: 14px 0 4px; }
        .btn {
            display: inline-block; background: var(--fg); color: var(--bg);
            border: none; border-radius: 6px; padding: 8px 16px;
            font-size: 14px; font-weight: 500; cursor: pointer; margin-top: 16px;
        }
        .btn-danger { background: var(--danger); color: var(--fg); margin-top: 0; }
        .btn-link { background: none; color: var(--fg-muted); }
        .searchbar { display: flex; gap: 8px; margin-bottom: 24px; }
        .searchbar input, .searchbar select { width: auto; flex: 1; }
        .searchbar .btn { margin-top: 0; }
        .muted { color: var(--fg-muted); }
        .actions { white-space: nowrap; }
        .topbar { display: flex; justify-content: space-between; align-items: center; margin-bottom: 24px; }
        .topbar h1 { margin-bottom: 0; }
    </style>
</head>
<body>
    <div class="header">
        <div class="header-content">
            <a href="/" class="logo">🎭 Contador de Dramas</a>
            <div class="nav">
                <a href="/">Dashboard</a>
                <a href="/usuarios">Usuários</a>
                <a href="/dramas">Dramas</a>
            </div>
        </div>
    </div>
    <div class="container">
        {% if success %}<div class="alert alert-success">{{ success }}</div>{% endif %}
        {% if warning %}<div class="alert alert-warning">{{ warning }}</div>{% endif %}
        {% if error %}<div class="alert alert-danger">{{ error }}</div>{% endif %}
        {% if info %}<div class="alert alert-info">{{ info }}</div>{% endif %}
        {% block content %}{% endblock %}
    </div>
</body>
</html>"##;

const INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Dashboard - Contador de Dramas{% endblock %}
{% block content %}
<h1>Dashboard</h1>

<div class="stat-grid">
    <div class="card">
        <div class="stat-value">{{ total_users }}</div>
        <div class="stat-label">Usuários</div>
    </div>
    <div class="card">
        <div class="stat-value">{{ total_dramas }}</div>
        <div class="stat-label">Dramas</div>
    </div>
    <div class="card">
        {% if avg_intensity %}
        <div class="stat-value">{{ avg_intensity }} {{ avg_emoji }}</div>
        {% else %}
        <div class="stat-value muted">&mdash;</div>
        {% endif %}
        <div class="stat-label">Intensidade média</div>
    </div>
</div>

<h1>Dramas recentes</h1>
{% if recent | length > 0 %}
<table>
    <tr><th></th><th>Drama</th><th>Autor</th><th>Quando</th></tr>
    {% for d in recent %}
    <tr>
        <td>{{ d.emoji }}</td>
        <td><a href="/dramas/{{ d.id }}/editar">{{ d.title }}</a></td>
        <td class="muted">{% if d.author %}{{ d.author }}{% else %}&mdash;{% endif %}</td>
        <td class="muted">{{ d.created }}</td>
    </tr>
    {% endfor %}
</table>
{% else %}
<p class="muted">Nenhum drama registrado ainda. <a href="/dramas/novo">Registre o primeiro!</a></p>
{% endif %}
{% endblock %}"##;

const USERS_LIST_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Usuários - Contador de Dramas{% endblock %}
{% block content %}
<div class="topbar">
    <h1>Usuários</h1>
    <a href="/usuarios/novo" class="btn">Novo usuário</a>
</div>

<form method="get" action="/usuarios" class="searchbar">
    <input type="text" name="q" value="{{ q }}" placeholder="Buscar por nome ou apelido">
    <button type="submit" class="btn">Buscar</button>
</form>

{% if users | length > 0 %}
<table>
    <tr><th>Nome</th><th>Apelido</th><th>Criado</th><th></th></tr>
    {% for u in users %}
    <tr>
        <td>{{ u.name }}</td>
        <td>{{ u.nickname }}</td>
        <td class="muted">{{ u.created }}</td>
        <td class="actions">
            <a href="/usuarios/{{ u.id }}/editar">Editar</a>
            <form method="post" action="/usuarios/{{ u.id }}/excluir" class="inline"
                  onsubmit="return confirm('Excluir usuário {{ u.nickname }}?');">
                <button type="submit" class="btn btn-danger">Excluir</button>
            </form>
        </td>
    </tr>
    {% endfor %}
</table>
{% else %}
<p class="muted">Nenhum usuário encontrado.</p>
{% endif %}
{% endblock %}"##;

const USER_NEW_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Novo usuário - Contador de Dramas{% endblock %}
{% block content %}
<h1>Novo usuário</h1>
<div class="card">
    <form method="post" action="/usuarios/novo">
        <label for="name">Nome</label>
        <input type="text" id="name" name="name" placeholder="Ana Silva">
        <label for="nickname">Apelido</label>
        <input type="text" id="nickname" name="nickname" placeholder="ana">
        <button type="submit" class="btn">Criar</button>
        <a href="/usuarios" class="btn btn-link">Cancelar</a>
    </form>
</div>
{% endblock %}"##;

const USER_EDIT_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Editar usuário - Contador de Dramas{% endblock %}
{% block content %}
<h1>Editar usuário</h1>
<div class="card">
    <form method="post" action="/usuarios/{{ u.id }}/editar">
        <label for="name">Nome</label>
        <input type="text" id="name" name="name" value="{{ u.name }}">
        <label for="nickname">Apelido</label>
        <input type="text" id="nickname" name="nickname" value="{{ u.nickname }}">
        <button type="submit" class="btn">Salvar</button>
        <a href="/usuarios" class="btn btn-link">Cancelar</a>
    </form>
</div>
{% endblock %}"##;

const DRAMAS_LIST_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Dramas - Contador de Dramas{% endblock %}
{% block content %}
<div class="topbar">
    <h1>Dramas</h1>
    <a href="/dramas/novo" class="btn">Novo drama</a>
</div>

<form method="get" action="/dramas" class="searchbar">
    <input type="text" name="q" value="{{ q }}" placeholder="Buscar por título ou descrição">
    <select name="user_id">
        <option value="">Todos os autores</option>
        {% for user in users %}
        <option value="{{ user.id }}" {% if uid == user.id %}selected{% endif %}>{{ user.nickname }}</option>
        {% endfor %}
    </select>
    <button type="submit" class="btn">Filtrar</button>
</form>

{% if dramas | length > 0 %}
<table>
    <tr><th></th><th>Drama</th><th>Descrição</th><th>Autor</th><th>Quando</th><th></th></tr>
    {% for d in dramas %}
    <tr>
        <td>{{ d.emoji }} {{ d.intensity }}</td>
        <td>{{ d.title }}</td>
        <td class="muted">{{ d.description | truncate(length=80) }}</td>
        <td class="muted">{% if d.author %}{{ d.author }}{% else %}&mdash;{% endif %}</td>
        <td class="muted">{{ d.created }}</td>
        <td class="actions">
            <a href="/dramas/{{ d.id }}/editar">Editar</a>
            <form method="post" action="/dramas/{{ d.id }}/excluir" class="inline"
                  onsubmit="return confirm('Excluir este drama?');">
                <button type="submit" class="btn btn-danger">Excluir</button>
            </form>
        </td>
    </tr>
    {% endfor %}
</table>
{% else %}
<p class="muted">Nenhum drama encontrado.</p>
{% endif %}
{% endblock %}"##;

const DRAMA_NEW_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Novo drama - Contador de Dramas{% endblock %}
{% block content %}
<h1>Novo drama</h1>
<div class="card">
    <form method="post" action="/dramas/novo">
        <label for="title">Drama</label>
        <input type="text" id="title" name="title" placeholder="Café derramado no teclado">
        <label for="description">Descrição</label>
        <textarea id="description" name="description" rows="4"></textarea>
        <label for="intensity">Intensidade (0 a 10)</label>
        <input type="number" id="intensity" name="intensity" min="0" max="10" value="0">
        <label for="user_id">Autor (opcional)</label>
        <select id="user_id" name="user_id">
            <option value="">Sem autor</option>
            {% for user in users %}
            <option value="{{ user.id }}">{{ user.nickname }}</option>
            {% endfor %}
        </select>
        <button type="submit" class="btn">Registrar</button>
        <a href="/dramas" class="btn btn-link">Cancelar</a>
    </form>
</div>
{% endblock %}"##;

const DRAMA_EDIT_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Editar drama - Contador de Dramas{% endblock %}
{% block content %}
<h1>Editar drama</h1>
<div class="card">
    <form method="post" action="/dramas/{{ d.id }}/editar">
        <label for="title">Drama</label>
        <input type="text" id="title" name="title" value="{{ d.title }}">
        <label for="description">Descrição</label>
        <textarea id="description" name="description" rows="4">{{ d.description }}</textarea>
        <label for="intensity">Intensidade (0 a 10)</label>
        <input type="number" id="intensity" name="intensity" min="0" max="10" value="{{ d.intensity }}">
        <label for="user_id">Autor (opcional)</label>
        <select id="user_id" name="user_id">
            <option value="">Sem autor</option>
            {% for user in users %}
            <option value="{{ user.id }}" {% if d.user_id == user.id %}selected{% endif %}>{{ user.nickname }}</option>
            {% endfor %}
        </select>
        <button type="submit" class="btn">Salvar</button>
        <a href="/dramas" class="btn btn-link">Cancelar</a>
    </form>
</div>
{% endblock %}"##;

const ERROR_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Erro - Contador de Dramas{% endblock %}
{% block content %}
<h1>Ops!</h1>
<div class="card">
    <p>{{ message }}</p>
    <a href="/" class="btn">Voltar ao dashboard</a>
</div>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_templates_parse() {
        // Forcing the Lazy panics here if any template is malformed
        assert!(TEMPLATES.get_template_names().count() >= 9);
    }

    #[test]
    fn base_renders_flash_banners() {
        let mut context = Context::new();
        context.insert("message", "Drama 42 não encontrado");
        let html = render("error.html", &context).unwrap();
        assert!(html.contains("Drama 42 não encontrado"));
    }
}
